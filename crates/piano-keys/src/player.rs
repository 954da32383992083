//! Note player side channel
//!
//! The keyboard never plays anything itself. The host turns pressed-set
//! changes into [`PlayerCommand`]s and hands them to a [`NotePlayer`].
//! [`spawn_engine`] runs the player on its own thread and reports
//! [`EngineEvent::Ready`] once its sink is open.

use crate::config::PlayerSettings;
use crate::error::{Error, Result};
use crate::theory::Note;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// What the host asks the player to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    NoteOn(Note),
    NoteOff(Note),
}

/// Notifications from the engine thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine finished starting up
    Ready,
}

/// MIDI message types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note on: channel, note, velocity
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Note off: channel, note
    NoteOff { channel: u8, note: u8 },
}

impl MidiMessage {
    /// Build the message for a player command
    pub fn from_command(command: PlayerCommand, settings: &PlayerSettings) -> Self {
        match command {
            PlayerCommand::NoteOn(note) => MidiMessage::NoteOn {
                channel: settings.channel,
                note,
                velocity: settings.velocity,
            },
            PlayerCommand::NoteOff(note) => MidiMessage::NoteOff {
                channel: settings.channel,
                note,
            },
        }
    }

    /// Convert to raw MIDI bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            MidiMessage::NoteOn { channel, note, velocity } => {
                vec![0x90 | (channel & 0x0F), *note & 0x7F, *velocity & 0x7F]
            }
            MidiMessage::NoteOff { channel, note } => {
                vec![0x80 | (channel & 0x0F), *note & 0x7F, 0]
            }
        }
    }
}

/// Where the engine delivers messages
pub trait NoteSink: Send {
    /// Prepare the sink; the engine reports ready once this succeeds
    fn open(&mut self) -> Result<()>;

    /// Deliver one message
    fn send(&mut self, message: MidiMessage) -> Result<()>;

    fn name(&self) -> &str;
}

/// Sink that logs every message
#[derive(Debug, Default)]
pub struct LogSink;

impl NoteSink for LogSink {
    fn open(&mut self) -> Result<()> {
        log::info!("Log sink opened");
        Ok(())
    }

    fn send(&mut self, message: MidiMessage) -> Result<()> {
        log::debug!("MIDI {:?} {:02X?}", message, message.to_bytes());
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Anything that can play notes
pub trait NotePlayer {
    fn note_on(&self, note: Note);

    fn note_off(&self, note: Note);

    /// Get the player name
    fn name(&self) -> &str;

    /// Play a batch of commands in order
    fn play(&self, commands: &[PlayerCommand]) {
        for command in commands {
            match *command {
                PlayerCommand::NoteOn(note) => self.note_on(note),
                PlayerCommand::NoteOff(note) => self.note_off(note),
            }
        }
    }
}

/// Handle to a running engine thread
pub struct PlayerHandle {
    tx: Sender<PlayerCommand>,
    events: Receiver<EngineEvent>,
    name: String,
    thread: JoinHandle<()>,
}

impl PlayerHandle {
    /// Poll for the ready notification (non-blocking)
    pub fn try_ready(&self) -> bool {
        matches!(self.events.try_recv(), Ok(EngineEvent::Ready))
    }

    /// Get the event receiver for blocking waits
    pub fn events(&self) -> &Receiver<EngineEvent> {
        &self.events
    }

    /// Stop the engine and wait for its thread
    pub fn shutdown(self) {
        let PlayerHandle { tx, thread, name, .. } = self;
        drop(tx);
        if thread.join().is_err() {
            log::warn!("Engine thread '{}' panicked", name);
        }
    }
}

impl NotePlayer for PlayerHandle {
    fn note_on(&self, note: Note) {
        if self.tx.send(PlayerCommand::NoteOn(note)).is_err() {
            log::warn!("Engine stopped, dropping note on {}", note);
        }
    }

    fn note_off(&self, note: Note) {
        if self.tx.send(PlayerCommand::NoteOff(note)).is_err() {
            log::warn!("Engine stopped, dropping note off {}", note);
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Start the engine on a background thread
pub fn spawn_engine(settings: PlayerSettings, mut sink: Box<dyn NoteSink>) -> Result<PlayerHandle> {
    let (tx, rx) = unbounded::<PlayerCommand>();
    let (event_tx, event_rx) = unbounded();
    let name = sink.name().to_string();

    let thread = thread::Builder::new()
        .name("piano-engine".to_string())
        .spawn(move || {
            if let Err(e) = sink.open() {
                log::error!("Failed to open sink '{}': {}", sink.name(), e);
                return;
            }
            let _ = event_tx.send(EngineEvent::Ready);

            for command in rx.iter() {
                let message = MidiMessage::from_command(command, &settings);
                if let Err(e) = sink.send(message) {
                    log::warn!("Sink '{}' rejected {:?}: {}", sink.name(), message, e);
                }
            }
            log::info!("Engine '{}' stopped", sink.name());
        })
        .map_err(|e| Error::Player(format!("Could not start engine thread: {}", e)))?;

    Ok(PlayerHandle {
        tx,
        events: event_rx,
        name,
        thread,
    })
}
