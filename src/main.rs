//! Binary entrypoint for the wezyk CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml`
//! - `demo [--name <n>]` - play a headless human-vs-bot game to the end
//! - `rooms` - list stored multiplayer rooms
//!
//! See the library crate docs for module-level details: `wezyk::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use wezyk::config::Config;
use wezyk::game::engine::{self, Decision};
use wezyk::game::{bot, Session};
use wezyk::server::GameService;

#[derive(Parser)]
#[command(name = "wezyk")]
#[command(about = "Asynchronous snakes and ladders: hot-seat, bot and room multiplayer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a starter configuration file
    Init,
    /// Play a headless human-vs-bot game to completion
    Demo {
        /// Name of the human seat
        #[arg(long, default_value = "Gracz")]
        name: String,
    },
    /// List stored multiplayer rooms
    Rooms,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Init => {
            Config::create_default(&cli.config).await?;
            println!("Wrote starter configuration to {}", cli.config);
        }
        Commands::Demo { name } => {
            let config = pre_config.unwrap_or_default();
            info!("starting demo game for {}", name);
            run_demo(&config, &name)?;
        }
        Commands::Rooms => {
            let config = pre_config.unwrap_or_default();
            let service = GameService::new(config)?;
            let codes = service.store().list()?;
            if codes.is_empty() {
                println!("No rooms stored.");
            }
            for code in codes {
                let session = service.store().load(&code)?;
                let status = session
                    .winner_name()
                    .map(|w| format!("won by {}", w))
                    .unwrap_or_else(|| "in play".to_string());
                println!(
                    "{}  players={} moves={} version={}  {}",
                    code,
                    session.players.len(),
                    session.move_count,
                    session.version,
                    status
                );
            }
        }
    }

    Ok(())
}

/// Drive a full human-vs-bot game from the terminal, printing each move.
/// The "human" rolls blindly and always retreats from shield decisions.
fn run_demo(config: &Config, human: &str) -> Result<()> {
    let mut session = Session::new_bot_game(human.to_string(), config.game.bot_name.clone());
    let mut rng = rand::thread_rng();
    let mut fuse = 0;
    while !session.finished() && fuse < 1000 {
        fuse += 1;
        if let Some(pending) = session.pending.clone() {
            let Some(index) = session.player_index_by_id(&pending.player) else {
                break;
            };
            if session.players[index].is_bot {
                bot::drive(&mut session, &mut rng);
            } else {
                engine::resolve_decision(&mut session, index, Decision::Retreat)?;
            }
        } else if session.players[session.turn].is_bot {
            bot::drive(&mut session, &mut rng);
        } else {
            let turn = session.turn;
            engine::resolve_roll(&mut session, turn, &mut rng)?;
        }
        println!("{}", session.message);
    }
    if let Some(winner) = session.winner_name() {
        println!("Koniec gry: wygrywa {}.", winner);
    }
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    builder.format(|fmt, record| {
        writeln!(
            fmt,
            "{} [{}] {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            record.level(),
            record.args()
        )
    });
    if let Some(cfg) = config {
        if let Some(ref file) = cfg.logging.file {
            if let Ok(f) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
            {
                builder.target(env_logger::Target::Pipe(Box::new(f)));
            }
        }
    }
    if !atty::is(atty::Stream::Stdout) {
        builder.write_style(env_logger::WriteStyle::Never);
    }
    let _ = builder.try_init();
}
