//! Piano keyboard state
//!
//! The keyboard is a plain value: events are applied with [`Keyboard::update`],
//! which returns the next state. Nothing here talks to a player; the host
//! compares pressed sets with [`NoteDiff::between`] to find out what to play.

use std::collections::{BTreeSet, HashMap};

use ratatui::style::Color;

use crate::theory::{is_natural, Note, NoteRange, MAX_NOTE, MIN_NOTE};

/// Default color of a pressed natural key
pub const PRESSED_NATURAL_COLOR: Color = Color::LightGreen;
/// Default color of a released natural key
pub const NATURAL_COLOR: Color = Color::White;
/// Default color of a pressed accidental key
pub const PRESSED_ACCIDENTAL_COLOR: Color = Color::Green;
/// Default color of a released accidental key
pub const ACCIDENTAL_COLOR: Color = Color::Black;

/// Events the keyboard reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardEvent {
    /// A key went down
    KeyDown(Note),
    /// A key came up
    KeyUp(Note),
    /// Show a different span of notes
    ChangeNoteRange(NoteRange),
}

/// Widget options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Key presses and releases change the pressed set
    pub interactive: bool,
    /// Render one button per keyboard size
    pub show_size_selector: bool,
    /// Render the names of the pressed notes
    pub debug_notes: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            interactive: true,
            show_size_selector: false,
            debug_notes: false,
        }
    }
}

/// Piano keyboard state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Keyboard {
    /// Currently pressed notes, ascending
    pub pressed_notes: BTreeSet<Note>,
    /// Visible notes
    pub note_range: NoteRange,
    pub config: WidgetConfig,
    /// Color overrides for pressed keys
    pub pressed_colors: HashMap<Note, Color>,
    /// Color overrides for released keys
    pub unpressed_colors: HashMap<Note, Color>,
}

impl Keyboard {
    /// Create a keyboard showing the default range with nothing pressed
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Start from a different range
    pub fn with_range(mut self, range: NoteRange) -> Self {
        self.note_range = range;
        self
    }

    /// Apply an event and return the next state
    ///
    /// Presses and releases are dropped unless the keyboard is interactive,
    /// and so are notes above [`MAX_NOTE`]; range changes always go through.
    pub fn update(mut self, event: KeyboardEvent) -> Self {
        match event {
            KeyboardEvent::KeyDown(note) | KeyboardEvent::KeyUp(note) if note > MAX_NOTE => {
                log::warn!("Ignoring {:?}: not a MIDI note", event);
            }
            KeyboardEvent::KeyDown(note) if self.config.interactive => {
                self.pressed_notes.insert(note);
            }
            KeyboardEvent::KeyUp(note) if self.config.interactive => {
                self.pressed_notes.remove(&note);
            }
            KeyboardEvent::KeyDown(_) | KeyboardEvent::KeyUp(_) => {
                log::debug!("Ignoring {:?} on a passive keyboard", event);
            }
            KeyboardEvent::ChangeNoteRange(range) => {
                self.note_range = range;
            }
        }
        self
    }

    /// Check if a note is currently pressed
    pub fn is_note_pressed(&self, note: Note) -> bool {
        self.pressed_notes.contains(&note)
    }

    /// Color every pressed key: naturals `white`, accidentals `black`
    pub fn color_all_pressed_keys(mut self, white: Color, black: Color) -> Self {
        self.pressed_colors = color_all_keys(white, black);
        self
    }

    /// Color every released key: naturals `white`, accidentals `black`
    pub fn color_all_unpressed_keys(mut self, white: Color, black: Color) -> Self {
        self.unpressed_colors = color_all_keys(white, black);
        self
    }

    /// Override the pressed color of a single key
    pub fn color_key_pressed(mut self, note: Note, color: Color) -> Self {
        self.pressed_colors.insert(note, color);
        self
    }

    /// Override the released color of a single key
    pub fn color_key_unpressed(mut self, note: Note, color: Color) -> Self {
        self.unpressed_colors.insert(note, color);
        self
    }

    /// Drop all color overrides
    pub fn clear_colors(mut self) -> Self {
        self.pressed_colors.clear();
        self.unpressed_colors.clear();
        self
    }

    /// Color a key is drawn with in its current state
    pub fn key_color(&self, note: Note) -> Color {
        let active = self.is_note_pressed(note);
        let overrides = if active {
            &self.pressed_colors
        } else {
            &self.unpressed_colors
        };
        overrides
            .get(&note)
            .copied()
            .unwrap_or_else(|| default_key_color(note, active))
    }
}

/// Built-in key color when no override is set
pub fn default_key_color(note: Note, active: bool) -> Color {
    match (is_natural(note), active) {
        (true, true) => PRESSED_NATURAL_COLOR,
        (true, false) => NATURAL_COLOR,
        (false, true) => PRESSED_ACCIDENTAL_COLOR,
        (false, false) => ACCIDENTAL_COLOR,
    }
}

fn color_all_keys(white: Color, black: Color) -> HashMap<Note, Color> {
    (MIN_NOTE..=MAX_NOTE)
        .map(|note| (note, if is_natural(note) { white } else { black }))
        .collect()
}

/// Notes that changed between two pressed sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDiff {
    /// In `after` but not `before`, ascending
    pub pressed: Vec<Note>,
    /// In `before` but not `after`, ascending
    pub released: Vec<Note>,
}

impl NoteDiff {
    pub fn between(before: &BTreeSet<Note>, after: &BTreeSet<Note>) -> Self {
        Self {
            pressed: after.difference(before).copied().collect(),
            released: before.difference(after).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty() && self.released.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::KeyboardSize;
    use super::KeyboardEvent::*;

    fn interactive() -> Keyboard {
        Keyboard::new(WidgetConfig::default())
    }

    fn passive() -> Keyboard {
        Keyboard::new(WidgetConfig {
            interactive: false,
            ..WidgetConfig::default()
        })
    }

    #[test]
    fn test_new_keyboard() {
        let keyboard = interactive();
        assert!(keyboard.pressed_notes.is_empty());
        assert_eq!(keyboard.note_range, KeyboardSize::Keys25.range());
    }

    #[test]
    fn test_key_down_is_idempotent() {
        let once = interactive().update(KeyDown(60));
        let twice = once.clone().update(KeyDown(60));
        assert_eq!(once.pressed_notes, twice.pressed_notes);
        assert!(twice.is_note_pressed(60));
    }

    #[test]
    fn test_key_up_absent_note() {
        let keyboard = interactive().update(KeyDown(64));
        let after = keyboard.clone().update(KeyUp(60));
        assert_eq!(keyboard.pressed_notes, after.pressed_notes);
    }

    #[test]
    fn test_key_down_up_round_trip() {
        let before = interactive().update(KeyDown(48));
        let after = before.clone().update(KeyDown(50)).update(KeyUp(50));
        assert_eq!(before.pressed_notes, after.pressed_notes);
    }

    #[test]
    fn test_out_of_range_note_ignored() {
        let keyboard = interactive().update(KeyDown(200));
        assert!(keyboard.pressed_notes.is_empty());

        let keyboard = keyboard.update(KeyDown(MAX_NOTE)).update(KeyUp(200));
        assert_eq!(keyboard.pressed_notes, BTreeSet::from([MAX_NOTE]));
    }

    #[test]
    fn test_passive_keyboard_ignores_keys() {
        let range = KeyboardSize::Keys61.range();
        let keyboard = passive()
            .update(KeyDown(60))
            .update(KeyDown(62))
            .update(KeyUp(60))
            .update(ChangeNoteRange(range));
        assert!(keyboard.pressed_notes.is_empty());
        assert_eq!(keyboard.note_range, range);
    }

    #[test]
    fn test_end_to_end_session() {
        let k0 = interactive();

        let k1 = k0.clone().update(KeyDown(60));
        let diff = NoteDiff::between(&k0.pressed_notes, &k1.pressed_notes);
        assert_eq!(diff.pressed, vec![60]);
        assert!(diff.released.is_empty());

        let k2 = k1.clone().update(KeyDown(64));
        assert_eq!(k2.pressed_notes, BTreeSet::from([60, 64]));
        assert_eq!(NoteDiff::between(&k1.pressed_notes, &k2.pressed_notes).pressed, vec![64]);

        let k3 = k2.clone().update(KeyUp(60));
        assert_eq!(k3.pressed_notes, BTreeSet::from([64]));
        let diff = NoteDiff::between(&k2.pressed_notes, &k3.pressed_notes);
        assert_eq!(diff.released, vec![60]);
        assert!(diff.pressed.is_empty());

        let k4 = k3.clone().update(ChangeNoteRange(NoteRange::new(9, 96)));
        assert_eq!(k4.note_range, KeyboardSize::Keys88.range());
        assert_eq!(k4.pressed_notes, BTreeSet::from([64]));
        assert!(NoteDiff::between(&k3.pressed_notes, &k4.pressed_notes).is_empty());
    }

    #[test]
    fn test_default_colors() {
        let keyboard = interactive().update(KeyDown(60)).update(KeyDown(61));
        assert_eq!(keyboard.key_color(60), PRESSED_NATURAL_COLOR);
        assert_eq!(keyboard.key_color(61), PRESSED_ACCIDENTAL_COLOR);
        assert_eq!(keyboard.key_color(62), NATURAL_COLOR);
        assert_eq!(keyboard.key_color(63), ACCIDENTAL_COLOR);
    }

    #[test]
    fn test_color_all_keys_covers_every_note() {
        let keyboard = interactive()
            .color_all_pressed_keys(Color::Yellow, Color::Red)
            .color_all_unpressed_keys(Color::Gray, Color::DarkGray);
        assert_eq!(keyboard.pressed_colors.len(), 128);
        assert_eq!(keyboard.unpressed_colors.len(), 128);

        let keyboard = keyboard.update(KeyDown(60)).update(KeyDown(61));
        assert_eq!(keyboard.key_color(60), Color::Yellow);
        assert_eq!(keyboard.key_color(61), Color::Red);
        assert_eq!(keyboard.key_color(62), Color::Gray);
        assert_eq!(keyboard.key_color(63), Color::DarkGray);
    }

    #[test]
    fn test_single_key_override() {
        let keyboard = interactive().color_key_unpressed(62, Color::Blue);
        assert_eq!(keyboard.key_color(62), Color::Blue);
        // Pressed state falls back to the default
        let keyboard = keyboard.update(KeyDown(62));
        assert_eq!(keyboard.key_color(62), PRESSED_NATURAL_COLOR);

        let keyboard = keyboard.clear_colors().update(KeyUp(62));
        assert_eq!(keyboard.key_color(62), NATURAL_COLOR);
    }
}
