//! Interactive spectator mode
//!
//! Keyboard lines are turned into [`Command`]s and fed to the same command
//! loop that drives autoplay, so typing and autoplay ticks never race.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::{
    cli::view::{SharedSnapshot, TerminalRenderer, format_memory},
    client::GameClient,
    config::{NewGameDefaults, PlaybackConfig},
    playback::{Command, PlaybackController, autoplay_to_end, run_commands},
    types::{GameSnapshot, PlayerId},
};

/// Parameters for the game started by `play` and `watch`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayOptions {
    pub players: u32,
    pub wolves: u32,
    pub seed: i64,
    /// Adopt the backend's current game instead of starting one
    pub resume: bool,
}

impl PlayOptions {
    pub fn from_defaults(defaults: NewGameDefaults) -> Self {
        Self {
            players: defaults.players,
            wolves: defaults.wolves,
            seed: defaults.seed,
            resume: false,
        }
    }
}

/// One parsed line of keyboard input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Memory(PlayerId),
    Help,
    Invalid(String),
}

/// Parse one line typed by the spectator
pub fn parse_input(line: &str, defaults: NewGameDefaults) -> Input {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Input::Command(Command::Advance);
    };
    let rest: Vec<&str> = words.collect();

    match (head, rest.as_slice()) {
        ("a" | "auto", []) => Input::Command(Command::ToggleAutoplay),
        ("q" | "quit", []) => Input::Command(Command::Quit),
        ("h" | "help" | "?", []) => Input::Help,
        ("n" | "new", []) => Input::Command(Command::NewGame {
            players: defaults.players,
            wolves: defaults.wolves,
            seed: defaults.seed,
        }),
        ("n" | "new", [players, wolves, seed]) => {
            match (players.parse(), wolves.parse(), seed.parse()) {
                (Ok(players), Ok(wolves), Ok(seed)) => Input::Command(Command::NewGame {
                    players,
                    wolves,
                    seed,
                }),
                _ => Input::Invalid("Usage: n <players> <wolves> <seed>".to_string()),
            }
        }
        ("m" | "memory", [id]) => match id.parse::<u32>() {
            Ok(id) => Input::Memory(PlayerId(id)),
            Err(_) => Input::Invalid("Usage: m <player id>".to_string()),
        },
        _ => Input::Invalid(format!("Unknown input '{}'. Type h for help.", line.trim())),
    }
}

fn print_controls() {
    println!("Controls:");
    println!("  Enter:        next event / next phase");
    println!("  a:            toggle autoplay");
    println!("  n [p w seed]: new game");
    println!("  m <id>:       show a player's memory");
    println!("  q:            quit");
    println!();
}

fn print_memory(latest: &SharedSnapshot, id: PlayerId) {
    let snapshot = latest.lock().ok().and_then(|s| s.clone());
    match snapshot {
        Some(snapshot) => {
            for line in format_memory(&snapshot, id) {
                println!("{}", line);
            }
        }
        None => println!("No game in progress."),
    }
}

/// Forward stdin lines as commands until EOF or `q`
async fn read_input(
    commands: mpsc::Sender<Command>,
    latest: SharedSnapshot,
    defaults: NewGameDefaults,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::warn!("failed to read input: {}", e);
                break;
            }
        };

        match parse_input(&line, defaults) {
            Input::Command(command) => {
                let quit = command == Command::Quit;
                if commands.send(command).await.is_err() || quit {
                    break;
                }
            }
            Input::Memory(id) => print_memory(&latest, id),
            Input::Help => print_controls(),
            Input::Invalid(message) => println!("{}", message),
        }
    }
}

fn controller_for(
    client: Arc<dyn GameClient>,
    config: &PlaybackConfig,
    latest: SharedSnapshot,
) -> PlaybackController {
    let mut controller = PlaybackController::with_autoplay_delay(client, config.autoplay_delay());
    controller.add_observer(Box::new(TerminalRenderer::new(latest)));
    controller
}

/// Run the interactive spectator until the user quits
pub async fn run_play(
    client: Arc<dyn GameClient>,
    config: &PlaybackConfig,
    options: PlayOptions,
) -> anyhow::Result<()> {
    let latest: SharedSnapshot = Arc::new(Mutex::new(None));
    let mut controller = controller_for(client, config, Arc::clone(&latest));

    println!("=== Werewolf Playback ===");
    println!();
    print_controls();

    if !(options.resume && controller.resume().await) {
        if options.resume {
            println!("No game to resume, starting a new one.");
        }
        controller
            .new_game(options.players, options.wolves, options.seed)
            .await?;
    }

    let (tx, mut rx) = mpsc::channel(16);
    let reader = tokio::spawn(read_input(tx, latest, config.new_game));

    run_commands(&mut controller, &mut rx).await;
    reader.abort();

    println!("Goodbye!");
    Ok(())
}

/// Start a game and autoplay it to the end without input
pub async fn run_watch(
    client: Arc<dyn GameClient>,
    config: &PlaybackConfig,
    options: PlayOptions,
) -> anyhow::Result<()> {
    let latest: SharedSnapshot = Arc::new(Mutex::new(None));
    let mut controller = controller_for(client, config, latest);

    controller
        .new_game(options.players, options.wolves, options.seed)
        .await?;
    autoplay_to_end(&mut controller).await?;

    println!();
    println!("== THE END ==");
    Ok(())
}

/// Print the backend's current game
pub async fn run_state(client: Arc<dyn GameClient>) -> anyhow::Result<()> {
    match client.get_state().await {
        Some(snapshot) => print_snapshot(&snapshot),
        None => println!("No game in progress."),
    }
    Ok(())
}

fn print_snapshot(snapshot: &GameSnapshot) {
    println!("Game:   {}", snapshot.game_id);
    println!("Round:  {}", snapshot.round);
    println!("Phase:  {}", snapshot.phase);
    println!(
        "Alive:  {} wolves, {} villagers",
        snapshot.alive_wolves, snapshot.alive_villagers
    );
    if let Some(winner) = snapshot.winner {
        println!("Winner: {}", winner);
    }
    println!();
    for player in &snapshot.players {
        let status = if player.alive { "alive" } else { "dead" };
        println!("  P{:<3} {:<9} {}", player.id.0, player.role.as_str(), status);
    }
    println!();
    println!("{} events logged", snapshot.events.len());
}
