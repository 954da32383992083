//! Host model
//!
//! Owns the keyboard, waits for the player engine to come up and turns every
//! change of the pressed set into note-on/note-off commands.

use crate::keyboard::{Keyboard, KeyboardEvent, NoteDiff};
use crate::player::PlayerCommand;
use crate::theory::Note;

/// Keyboard plus the bits of host state around it
#[derive(Debug, Clone)]
pub struct Host {
    keyboard: Keyboard,
    engine_ready: bool,
    /// Note held by the pointer, if any
    held: Option<Note>,
}

impl Host {
    pub fn new(keyboard: Keyboard) -> Self {
        Self {
            keyboard,
            engine_ready: false,
            held: None,
        }
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn is_engine_ready(&self) -> bool {
        self.engine_ready
    }

    /// Record the engine-ready notification
    ///
    /// Returns true only for the first notification.
    pub fn engine_ready(&mut self) -> bool {
        if self.engine_ready {
            return false;
        }
        log::info!("Sound engine ready, showing keyboard");
        self.engine_ready = true;
        true
    }

    /// Apply a keyboard event and return what the player should do
    ///
    /// Releases come before presses. Nothing happens until the engine is ready.
    pub fn handle(&mut self, event: KeyboardEvent) -> Vec<PlayerCommand> {
        if !self.engine_ready {
            log::debug!("Engine not ready, dropping {:?}", event);
            return Vec::new();
        }

        let before = self.keyboard.pressed_notes.clone();
        self.keyboard = std::mem::take(&mut self.keyboard).update(event);
        let diff = NoteDiff::between(&before, &self.keyboard.pressed_notes);
        if !diff.is_empty() {
            log::debug!("{:?} -> {:?}", event, diff);
        }

        diff.released
            .into_iter()
            .map(PlayerCommand::NoteOff)
            .chain(diff.pressed.into_iter().map(PlayerCommand::NoteOn))
            .collect()
    }

    /// Pointer went down on a key
    pub fn pointer_down(&mut self, note: Note) -> Vec<PlayerCommand> {
        let mut commands = self.pointer_up();
        self.held = Some(note);
        commands.extend(self.handle(KeyboardEvent::KeyDown(note)));
        commands
    }

    /// Pointer dragged to another key, or off the keyboard
    pub fn pointer_moved(&mut self, note: Option<Note>) -> Vec<PlayerCommand> {
        match (self.held, note) {
            (Some(held), Some(note)) if held != note => self.pointer_down(note),
            (Some(_), None) => self.pointer_up(),
            _ => Vec::new(),
        }
    }

    /// Pointer came up; releases the held key
    pub fn pointer_up(&mut self) -> Vec<PlayerCommand> {
        match self.held.take() {
            Some(note) => self.handle(KeyboardEvent::KeyUp(note)),
            None => Vec::new(),
        }
    }

    /// Release every pressed note (focus loss, quitting)
    pub fn release_all(&mut self) -> Vec<PlayerCommand> {
        self.held = None;
        let pressed: Vec<Note> = self.keyboard.pressed_notes.iter().copied().collect();
        pressed
            .into_iter()
            .flat_map(|note| self.handle(KeyboardEvent::KeyUp(note)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::WidgetConfig;
    use crate::theory::{KeyboardSize, NoteRange};
    use std::collections::BTreeSet;
    use crate::keyboard::KeyboardEvent::*;
    use crate::player::PlayerCommand::*;

    fn ready_host(config: WidgetConfig) -> Host {
        let mut host = Host::new(Keyboard::new(config));
        host.engine_ready();
        host
    }

    #[test]
    fn test_ready_only_once() {
        let mut host = Host::new(Keyboard::default());
        assert!(!host.is_engine_ready());
        assert!(host.engine_ready());
        assert!(!host.engine_ready());
        assert!(host.is_engine_ready());
    }

    #[test]
    fn test_events_ignored_before_ready() {
        let mut host = Host::new(Keyboard::default());
        assert!(host.handle(KeyDown(60)).is_empty());
        assert!(host.keyboard().pressed_notes.is_empty());
    }

    #[test]
    fn test_end_to_end_session() {
        let mut host = ready_host(WidgetConfig::default());

        assert_eq!(host.handle(KeyDown(60)), vec![NoteOn(60)]);
        assert_eq!(host.handle(KeyDown(64)), vec![NoteOn(64)]);
        assert_eq!(host.keyboard().pressed_notes, BTreeSet::from([60, 64]));
        assert_eq!(host.handle(KeyUp(60)), vec![NoteOff(60)]);

        let commands = host.handle(ChangeNoteRange(NoteRange::new(9, 96)));
        assert!(commands.is_empty());
        assert_eq!(host.keyboard().note_range, KeyboardSize::Keys88.range());
        assert_eq!(host.keyboard().pressed_notes, BTreeSet::from([64]));
    }

    #[test]
    fn test_repeated_key_down_plays_once() {
        let mut host = ready_host(WidgetConfig::default());
        assert_eq!(host.handle(KeyDown(60)), vec![NoteOn(60)]);
        assert!(host.handle(KeyDown(60)).is_empty());
        assert!(host.handle(KeyUp(62)).is_empty());
    }

    #[test]
    fn test_out_of_range_note_plays_nothing() {
        let mut host = ready_host(WidgetConfig::default());
        assert!(host.handle(KeyDown(200)).is_empty());
        assert!(host.pointer_down(200).is_empty());
        assert!(host.keyboard().pressed_notes.is_empty());
    }

    #[test]
    fn test_passive_keyboard_plays_nothing() {
        let mut host = ready_host(WidgetConfig {
            interactive: false,
            ..WidgetConfig::default()
        });
        assert!(host.pointer_down(60).is_empty());
        assert!(host.pointer_up().is_empty());
        host.handle(ChangeNoteRange(KeyboardSize::Keys12.range()));
        assert_eq!(host.keyboard().note_range, KeyboardSize::Keys12.range());
    }

    #[test]
    fn test_pointer_glide() {
        let mut host = ready_host(WidgetConfig::default());
        assert_eq!(host.pointer_down(60), vec![NoteOn(60)]);
        assert!(host.pointer_moved(Some(60)).is_empty());
        assert_eq!(host.pointer_moved(Some(62)), vec![NoteOff(60), NoteOn(62)]);
        assert_eq!(host.pointer_moved(None), vec![NoteOff(62)]);
        assert!(host.pointer_up().is_empty());
        assert!(host.keyboard().pressed_notes.is_empty());
    }

    #[test]
    fn test_release_all() {
        let mut host = ready_host(WidgetConfig::default());
        host.handle(KeyDown(67));
        host.handle(KeyDown(60));
        assert_eq!(host.release_all(), vec![NoteOff(60), NoteOff(67)]);
        assert!(host.keyboard().pressed_notes.is_empty());
    }
}
