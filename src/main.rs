use std::io;
use std::path::PathBuf;

use chessworth::chess::game::Game;
use chessworth::session::Session;
use clap::Parser;
use log::LevelFilter;

/// Plays a game of Chessworth in the terminal. Both players enter their moves
/// in SAN.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Config {
    /// Starting position in FEN.
    #[arg(long)]
    fen: Option<String>,
    /// Most verbose log messages to show.
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
    /// Writes the log to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn setup_logger(config: &Config) -> anyhow::Result<()> {
    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ));
        })
        .level(config.log_level);
    let dispatch = match &config.log_file {
        Some(path) => dispatch.chain(fern::log_file(path)?),
        None => dispatch.chain(io::stderr()),
    };
    dispatch.apply()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    setup_logger(&config)?;
    chessworth::print_engine_info();
    chessworth::print_binary_info();
    let game = match &config.fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::starting(),
    };
    let mut session = Session::new(game, io::stdin().lock(), io::stdout().lock());
    let end = session.run()?;
    log::info!("Session ended: {end:?}");
    Ok(())
}
