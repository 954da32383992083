//! Note arithmetic
//!
//! Pure functions over MIDI note numbers plus the named keyboard sizes.
//! Everything here is total: notes outside 0-127 still get an octave,
//! a key class and a name.

/// A MIDI note number (0-127)
pub type Note = u8;

/// Lowest valid MIDI note
pub const MIN_NOTE: Note = 0;

/// Highest valid MIDI note
pub const MAX_NOTE: Note = 127;

/// Residues (mod 12) of the natural keys: C D E F G A B
const NATURAL_RESIDUES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Base letter for each residue; accidentals share the letter below them
const LETTERS: [char; 12] = ['C', 'C', 'D', 'D', 'E', 'F', 'F', 'G', 'G', 'A', 'A', 'B'];

/// Octave of a note (floored, so negative notes land in negative octaves)
pub fn octave(note: impl Into<i32>) -> i32 {
    note.into().div_euclid(12)
}

/// Whether the note is a natural (white) key
pub fn is_natural(note: impl Into<i32>) -> bool {
    NATURAL_RESIDUES.contains(&note.into().rem_euclid(12))
}

/// Name of a note, e.g. 60 -> "C5", 61 -> "C#5"
pub fn note_name(note: impl Into<i32>) -> String {
    let note = note.into();
    let letter = LETTERS[note.rem_euclid(12) as usize];
    let sharp = if is_natural(note) { "" } else { "#" };
    format!("{}{}{}", letter, sharp, octave(note))
}

/// Inclusive span of notes shown on the keyboard
///
/// Always `low <= high`; the only way in is [`NoteRange::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteRange {
    low: Note,
    high: Note,
}

impl NoteRange {
    /// Create a range; bounds given in the wrong order are swapped
    pub fn new(low: Note, high: Note) -> Self {
        if low <= high {
            Self { low, high }
        } else {
            Self { low: high, high: low }
        }
    }

    pub fn low(&self) -> Note {
        self.low
    }

    pub fn high(&self) -> Note {
        self.high
    }

    /// Number of keys in the range
    pub fn key_count(&self) -> usize {
        (self.high - self.low) as usize + 1
    }

    /// Notes of the range in ascending order
    pub fn notes(&self) -> impl Iterator<Item = Note> {
        self.low..=self.high
    }
}

impl Default for NoteRange {
    fn default() -> Self {
        KeyboardSize::default().range()
    }
}

/// Named keyboard sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyboardSize {
    Keys12,
    #[default]
    Keys25,
    Keys49,
    Keys61,
    Keys76,
    Keys88,
}

impl KeyboardSize {
    /// All presets, smallest first
    pub const ALL: [KeyboardSize; 6] = [
        KeyboardSize::Keys12,
        KeyboardSize::Keys25,
        KeyboardSize::Keys49,
        KeyboardSize::Keys61,
        KeyboardSize::Keys76,
        KeyboardSize::Keys88,
    ];

    /// The note range this preset covers
    pub fn range(self) -> NoteRange {
        let (low, high) = match self {
            KeyboardSize::Keys12 => (48, 59),
            KeyboardSize::Keys25 => (36, 60),
            KeyboardSize::Keys49 => (24, 72),
            KeyboardSize::Keys61 => (24, 84),
            KeyboardSize::Keys76 => (16, 91),
            KeyboardSize::Keys88 => (9, 96),
        };
        NoteRange::new(low, high)
    }

    pub fn key_count(self) -> usize {
        self.range().key_count()
    }

    /// Button label, e.g. "25-key piano"
    pub fn label(self) -> String {
        format!("{}-key piano", self.key_count())
    }

    /// Look up a preset by its number of keys
    pub fn from_key_count(keys: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.key_count() == keys)
    }

    /// The preset whose range equals `range`, if any
    pub fn from_range(range: NoteRange) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.range() == range)
    }
}
