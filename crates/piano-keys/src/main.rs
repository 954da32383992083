//! piano-keys - Interactive Piano Keyboard
//!
//! Click the keys with the mouse; notes go to the player side channel.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use piano_keys::{
    config::Config,
    host::Host,
    keyboard::KeyboardEvent,
    layout,
    player::{spawn_engine, LogSink, NotePlayer, PlayerCommand, PlayerHandle},
    theory::KeyboardSize,
    ui::{hit_test, render_standalone, selector_hit_test},
};

#[derive(Parser)]
#[command(name = "piano-keys")]
#[command(author, version, about = "Interactive piano keyboard for the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: ~/.config/piano-keys/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of keys (12, 25, 49, 61, 76 or 88)
    #[arg(short, long)]
    size: Option<usize>,

    /// Display only; clicks do not press keys
    #[arg(long)]
    passive: bool,

    /// Show the keyboard size buttons
    #[arg(long)]
    size_selector: bool,

    /// Show the names of the pressed notes
    #[arg(long)]
    debug_notes: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default configuration file
    Init,
    /// Show the configuration file path
    ConfigPath,
    /// List the keyboard sizes
    Presets,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let path = Config::create_default_config_file()?;
            println!("Created default config at: {}", path.display());
            return Ok(());
        }
        Some(Commands::ConfigPath) => {
            let path = Config::config_path()?;
            println!("{}", path.display());
            return Ok(());
        }
        Some(Commands::Presets) => {
            for size in KeyboardSize::ALL {
                let range = size.range();
                println!("{:>14}  notes {:>3}-{:<3}", size.label(), range.low(), range.high());
            }
            return Ok(());
        }
        None => {}
    }

    // Load config
    let mut config = match cli.config {
        Some(path) => Config::load_from(&path)?,
        None => Config::load_or_default(),
    };

    // Apply CLI overrides
    if let Some(size) = cli.size {
        if KeyboardSize::from_key_count(size).is_none() {
            bail!("Unsupported keyboard size {} (expected one of 12, 25, 49, 61, 76, 88)", size);
        }
        config.keyboard.size = size;
    }
    if cli.passive {
        config.keyboard.interactive = false;
    }
    if cli.size_selector {
        config.keyboard.show_size_selector = true;
    }
    if cli.debug_notes {
        config.keyboard.debug_notes = true;
    }
    config.player.channel = config.player.channel.min(15);
    config.player.velocity = config.player.velocity.clamp(1, 127);

    // Run the TUI
    run_tui(config)
}

fn run_tui(config: Config) -> Result<()> {
    let host = Host::new(config.to_keyboard()?);
    let player = spawn_engine(config.player.clone(), Box::new(LogSink))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, host, &player, &config);

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    player.shutdown();

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut host: Host,
    player: &PlayerHandle,
    config: &Config,
) -> Result<()> {
    loop {
        if player.try_ready() {
            host.engine_ready();
        }

        // Draw
        let mut keyboard_area = Rect::default();
        terminal.draw(|frame| {
            keyboard_area = render_standalone(frame, &host, player.name(), &config.theme);
        })?;

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Char(c @ '1'..='6') => {
                    let size = KeyboardSize::ALL[c as usize - '1' as usize];
                    play(player, host.handle(KeyboardEvent::ChangeNoteRange(size.range())));
                }
                _ => {}
            },
            Event::Mouse(mouse) => {
                let view = layout::view(host.keyboard());
                let note = hit_test(&view, keyboard_area, mouse.column, mouse.row);
                let commands = match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => match note {
                        Some(note) => host.pointer_down(note),
                        None => {
                            match selector_hit_test(&view, keyboard_area, mouse.column, mouse.row) {
                                Some(button) => host.handle(button.event),
                                None => Vec::new(),
                            }
                        }
                    },
                    MouseEventKind::Drag(MouseButton::Left) => host.pointer_moved(note),
                    MouseEventKind::Up(MouseButton::Left) => host.pointer_up(),
                    _ => Vec::new(),
                };
                play(player, commands);
            }
            Event::FocusLost => {
                // Release all notes when losing focus
                play(player, host.release_all());
            }
            _ => {}
        }
    }

    play(player, host.release_all());
    Ok(())
}

fn play(player: &dyn NotePlayer, commands: Vec<PlayerCommand>) {
    if !commands.is_empty() {
        player.play(&commands);
    }
}
