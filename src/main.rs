//! CLI entry point for werewolf-playback
//!
//! Connects to a running game backend and plays its phases back in the
//! terminal, either interactively or unattended.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use werewolf_playback::{
    GameClient, HttpGameClient, PlaybackConfig,
    cli::{self, PlayOptions},
};

#[derive(Parser)]
#[command(author, version, about = "Spectator playback for the werewolf simulation", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config and WEREWOLF_SERVER_URL)
    #[arg(long, global = true)]
    server: Option<String>,
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Autoplay delay in milliseconds
    #[arg(long, global = true)]
    delay_ms: Option<u64>,
    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand)]
enum Action {
    #[command(about = "Step through a game interactively")]
    Play {
        #[command(flatten)]
        game: GameArgs,
        /// Continue the backend's current game instead of starting one
        #[arg(long)]
        resume: bool,
    },
    #[command(about = "Autoplay a new game to the end")]
    Watch {
        #[command(flatten)]
        game: GameArgs,
    },
    #[command(about = "Print the backend's current game")]
    State,
}

#[derive(Args)]
struct GameArgs {
    #[arg(long)]
    players: Option<u32>,
    #[arg(long)]
    wolves: Option<u32>,
    #[arg(long)]
    seed: Option<i64>,
}

impl GameArgs {
    fn options(&self, config: &PlaybackConfig, resume: bool) -> PlayOptions {
        let defaults = PlayOptions::from_defaults(config.new_game);
        PlayOptions {
            players: self.players.unwrap_or(defaults.players),
            wolves: self.wolves.unwrap_or(defaults.wolves),
            seed: self.seed.unwrap_or(defaults.seed),
            resume,
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Cli::parse();

    let mut config = match PlaybackConfig::load(args.config.as_deref()).await {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: Failed to load configuration");
            eprintln!("Reason: {}", err);
            process::exit(1);
        }
    };
    if let Some(server) = args.server {
        config.server_url = server;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.autoplay_delay_ms = delay_ms;
    }
    log::debug!("config: {:?}", config);

    let client: Arc<dyn GameClient> = match HttpGameClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            eprintln!("Error: Failed to create HTTP client");
            eprintln!("Reason: {}", err);
            process::exit(1);
        }
    };

    let result = match &args.command {
        Action::Play { game, resume } => {
            cli::run_play(client, &config, game.options(&config, *resume)).await
        }
        Action::Watch { game } => cli::run_watch(client, &config, game.options(&config, false)).await,
        Action::State => cli::run_state(client).await,
    };

    if let Err(err) = result {
        eprintln!("Error: Playback failed");
        eprintln!("Reason: {}", err);
        process::exit(1);
    }
}
