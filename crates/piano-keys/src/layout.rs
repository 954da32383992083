//! Key layout
//!
//! Projects a [`Keyboard`] onto a list of key shapes in terminal cells.
//! Natural keys form the base row; accidentals are narrower, shorter and
//! sit on top, straddling the boundary between two naturals.
//!
//! ```text
//!  ┌──┬─┬─┬─┬──┬──┬─┬─┬─┬─┬─┬──┐
//!  │  │█│ │█│  │  │█│ │█│ │█│  │
//!  │  └┬┘ └┬┘  │  └┬┘ └┬┘ └┬┘  │
//!  │ C │ D │ E │ F │ G │ A │ B │
//!  └───┴───┴───┴───┴───┴───┴───┘
//! ```

use ratatui::style::Color;

use crate::keyboard::{Keyboard, KeyboardEvent};
use crate::theory::{is_natural, note_name, KeyboardSize, Note};

/// Width of a natural key in cells
pub const NATURAL_KEY_WIDTH: u16 = 4;
/// Height of a natural key in rows
pub const NATURAL_KEY_HEIGHT: u16 = 6;
/// Width of an accidental key in cells
pub const ACCIDENTAL_KEY_WIDTH: u16 = 2;
/// Height of an accidental key in rows
pub const ACCIDENTAL_KEY_HEIGHT: u16 = 4;
/// How far an accidental is pulled left over the natural before it
pub const ACCIDENTAL_KEY_OFFSET: u16 = 1;

/// Gap between two size buttons
const BUTTON_GAP: u16 = 1;

/// Natural or accidental
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Natural,
    Accidental,
}

impl KeyKind {
    pub fn of(note: Note) -> Self {
        if is_natural(note) {
            KeyKind::Natural
        } else {
            KeyKind::Accidental
        }
    }

    /// Stacking order; higher is drawn later
    pub fn z_index(self) -> u8 {
        match self {
            KeyKind::Natural => 0,
            KeyKind::Accidental => 1,
        }
    }
}

/// One key ready to be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct KeyVisual {
    pub note: Note,
    pub kind: KeyKind,
    /// Whether the note is pressed
    pub active: bool,
    pub color: Color,
    /// Left edge, relative to the first natural key; an accidental at the
    /// very start of the range hangs off to the left
    pub x: i32,
    pub width: u16,
    pub height: u16,
    pub z_index: u8,
    /// Sent when the pointer goes down on this key
    pub on_press: KeyboardEvent,
    /// Sent when the pointer comes up on this key
    pub on_release: KeyboardEvent,
}

impl KeyVisual {
    /// Whether the cell (`x`, `y`) lies inside the key
    pub fn contains(&self, x: i32, y: u16) -> bool {
        x >= self.x && x < self.x + self.width as i32 && y < self.height
    }

    pub fn name(&self) -> String {
        note_name(self.note)
    }
}

/// A keyboard-size button
#[derive(Debug, Clone, PartialEq)]
pub struct SizeButton {
    pub size: KeyboardSize,
    /// e.g. "25-key piano"
    pub label: String,
    /// The keyboard currently shows this size
    pub selected: bool,
    pub event: KeyboardEvent,
    /// Left edge on the selector line
    pub x: u16,
    pub width: u16,
}

impl SizeButton {
    /// Text drawn for the button
    pub fn text(&self) -> String {
        format!("[{}]", self.label)
    }
}

/// Everything needed to draw the keyboard
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardView {
    /// One entry per visible note, ascending
    pub keys: Vec<KeyVisual>,
    /// Width of the natural-key row
    pub width: u16,
    /// Empty unless the size selector is enabled
    pub size_selector: Vec<SizeButton>,
    /// Pressed note names, if enabled
    pub debug_text: Option<String>,
}

impl KeyboardView {
    /// Keys in drawing order: naturals first, accidentals on top
    pub fn keys_by_z(&self) -> impl Iterator<Item = &KeyVisual> {
        let naturals = self.keys.iter().filter(|k| k.kind == KeyKind::Natural);
        let accidentals = self.keys.iter().filter(|k| k.kind == KeyKind::Accidental);
        naturals.chain(accidentals)
    }

    /// The topmost key under a cell of the key area
    pub fn key_at(&self, x: i32, y: u16) -> Option<&KeyVisual> {
        self.keys
            .iter()
            .filter(|key| key.contains(x, y))
            .max_by_key(|key| key.z_index)
    }

    /// The size button under a column of the selector line
    pub fn button_at(&self, x: u16) -> Option<&SizeButton> {
        self.size_selector
            .iter()
            .find(|button| x >= button.x && x < button.x + button.width)
    }
}

/// Lay out the keyboard
pub fn view(keyboard: &Keyboard) -> KeyboardView {
    let mut keys = Vec::with_capacity(keyboard.note_range.key_count());
    let mut naturals: u16 = 0;

    for note in keyboard.note_range.notes() {
        let kind = KeyKind::of(note);
        let (x, width, height) = match kind {
            KeyKind::Natural => {
                let x = (naturals * NATURAL_KEY_WIDTH) as i32;
                naturals += 1;
                (x, NATURAL_KEY_WIDTH, NATURAL_KEY_HEIGHT)
            }
            KeyKind::Accidental => {
                let edge = (naturals * NATURAL_KEY_WIDTH) as i32;
                (
                    edge - ACCIDENTAL_KEY_OFFSET as i32,
                    ACCIDENTAL_KEY_WIDTH,
                    ACCIDENTAL_KEY_HEIGHT,
                )
            }
        };

        keys.push(KeyVisual {
            note,
            kind,
            active: keyboard.is_note_pressed(note),
            color: keyboard.key_color(note),
            x,
            width,
            height,
            z_index: kind.z_index(),
            on_press: KeyboardEvent::KeyDown(note),
            on_release: KeyboardEvent::KeyUp(note),
        });
    }

    let size_selector = if keyboard.config.show_size_selector {
        size_buttons(keyboard)
    } else {
        Vec::new()
    };

    let debug_text = keyboard
        .config
        .debug_notes
        .then(|| pressed_notes_text(keyboard));

    KeyboardView {
        keys,
        width: naturals * NATURAL_KEY_WIDTH,
        size_selector,
        debug_text,
    }
}

fn size_buttons(keyboard: &Keyboard) -> Vec<SizeButton> {
    let mut x = 0;
    KeyboardSize::ALL
        .iter()
        .map(|&size| {
            let label = size.label();
            let width = label.len() as u16 + 2;
            let button = SizeButton {
                size,
                label,
                selected: size.range() == keyboard.note_range,
                event: KeyboardEvent::ChangeNoteRange(size.range()),
                x,
                width,
            };
            x += width + BUTTON_GAP;
            button
        })
        .collect()
}

/// "Currently pressed notes: C4, E4, G4"
pub fn pressed_notes_text(keyboard: &Keyboard) -> String {
    let names: Vec<String> = keyboard.pressed_notes.iter().map(|&n| note_name(n)).collect();
    format!("Currently pressed notes: {}", names.join(", "))
}
