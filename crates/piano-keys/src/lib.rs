//! piano-keys - Interactive Piano Keyboard Widget
//!
//! A piano keyboard you can click in the terminal. The keyboard is a plain
//! state value with a pure update function; rendering is a projection of
//! that state. Features include:
//!
//! - Natural/accidental key layout for 12 to 88 keys
//! - Optional size selector and pressed-note readout
//! - Per-key color overrides for pressed and released keys
//! - A host that turns pressed-set changes into note-on/note-off commands
//! - Configurable via TOML file
//!
//! # Usage as a Library
//!
//! ```no_run
//! use piano_keys::{Keyboard, KeyboardEvent, NoteDiff, WidgetConfig};
//!
//! let before = Keyboard::new(WidgetConfig::default());
//! let after = before.clone().update(KeyboardEvent::KeyDown(60));
//!
//! let diff = NoteDiff::between(&before.pressed_notes, &after.pressed_notes);
//! for note in diff.pressed {
//!     println!("Play note {}", piano_keys::note_name(note));
//! }
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod keyboard;
pub mod layout;
pub mod player;
pub mod theory;
pub mod ui;

// Re-export main types
pub use config::{Config, Theme};
pub use error::{Error, Result};
pub use host::Host;
pub use keyboard::{Keyboard, KeyboardEvent, NoteDiff, WidgetConfig};
pub use layout::{view, KeyKind, KeyVisual, KeyboardView, SizeButton};
pub use player::{spawn_engine, EngineEvent, LogSink, MidiMessage, NotePlayer, NoteSink, PlayerCommand, PlayerHandle};
pub use theory::{is_natural, note_name, octave, KeyboardSize, Note, NoteRange};
pub use ui::{hit_test, render_standalone, selector_hit_test, PianoWidget};
