use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::PathBuf;
use stockroom_levels::LevelCatalog;
use stockroom_persist::CheckpointStore;
use stockroom_render::{DebugTextRenderer, Renderer};
use stockroom_session::{GameSession, Outcome, SessionConfig};
use stockroom_tools::SessionInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stockroom", about = "Box-pushing puzzles with undo across levels")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info and the levels of a collection
    Info {
        /// Level collection file
        levels: PathBuf,
    },
    /// Play command scripts against a level collection
    Play {
        /// JSON session config; flags below override its fields
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Level collection file
        #[arg(short, long)]
        levels: Option<PathBuf>,
        /// Save directory for checkpoints and high scores
        #[arg(long)]
        saves: Option<PathBuf>,
        /// Level to start on (0-based)
        #[arg(long)]
        start: Option<usize>,
        /// Commands to run (lurd moves, z undo, y redo, ! reload, > next, < previous).
        /// Read line by line from stdin when absent.
        #[arg(short, long)]
        script: Option<String>,
    },
    /// Verify every checkpoint file in a save directory
    Verify {
        /// Save directory
        saves: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info { levels } => {
            println!("stockroom v{}", env!("CARGO_PKG_VERSION"));
            println!("levels: {}", stockroom_levels::crate_info());
            println!("kernel: {}", stockroom_kernel::crate_info());
            println!("persist: {}", stockroom_persist::crate_info());
            println!("session: {}", stockroom_session::crate_info());
            println!("input: {}", stockroom_input::crate_info());
            println!("render: {}", stockroom_render::crate_info());
            println!("tools: {}", stockroom_tools::crate_info());

            let catalog = LevelCatalog::load(&levels)
                .with_context(|| format!("loading {}", levels.display()))?;
            println!("{} levels in {}", catalog.len(), levels.display());
            for (id, blueprint) in catalog.iter() {
                println!(
                    "  level {}: {} rows x {} cols, {} player(s)",
                    id,
                    blueprint.row_count(),
                    blueprint.max_width(),
                    blueprint.player_count()
                );
            }
        }
        Commands::Play {
            config,
            levels,
            saves,
            start,
            script,
        } => {
            let mut session_config = match config {
                Some(path) => SessionConfig::from_json_file(&path)
                    .with_context(|| format!("reading config {}", path.display()))?,
                None => SessionConfig::default(),
            };
            if let Some(levels) = levels {
                session_config.levels_path = levels;
            }
            if let Some(saves) = saves {
                session_config.save_dir = saves;
            }
            if let Some(start) = start {
                session_config.start_level = start;
            }

            let mut session = GameSession::start(&session_config)?;
            let renderer = DebugTextRenderer::new();
            print!("{}", renderer.render(&session));
            println!("{}", SessionInspector::summary(&session));

            match script {
                Some(script) => run_line(&mut session, &renderer, &script)?,
                None => {
                    for line in std::io::stdin().lock().lines() {
                        run_line(&mut session, &renderer, &line?)?;
                    }
                }
            }
            session.shutdown()?;
        }
        Commands::Verify { saves } => {
            anyhow::ensure!(saves.is_dir(), "{} is not a directory", saves.display());
            let store = CheckpointStore::open(&saves)?;
            let checkpoints = store.list()?;
            let failures = store.verify_all()?;
            for reference in &checkpoints {
                match failures.iter().find(|(failed, _)| failed == reference) {
                    Some((_, e)) => println!("{reference}: FAILED ({e})"),
                    None => {
                        let checkpoint = store.read(reference)?;
                        let previous = checkpoint
                            .previous
                            .map_or_else(|| "-".to_string(), |p| p.to_string());
                        println!(
                            "{reference}: OK level={} turns={} previous={previous}",
                            checkpoint.level,
                            checkpoint.turns.len()
                        );
                    }
                }
            }
            println!(
                "{} checkpoints, {} failed",
                checkpoints.len(),
                failures.len()
            );
            anyhow::ensure!(failures.is_empty(), "checkpoint verification failed");
        }
    }

    Ok(())
}

/// Run one line of commands and print the board afterwards.
fn run_line(
    session: &mut GameSession,
    renderer: &DebugTextRenderer,
    line: &str,
) -> anyhow::Result<()> {
    let commands = stockroom_input::parse_script(line)?;
    if commands.is_empty() {
        return Ok(());
    }
    for command in commands {
        if let Outcome::Solved {
            level,
            turns,
            new_best,
        } = session.apply(command)?
        {
            let best = if new_best { " (new best)" } else { "" };
            println!("Solved level {level} in {turns} turns{best}");
        }
    }
    print!("{}", renderer.render(&*session));
    println!("{}", SessionInspector::summary(session));
    Ok(())
}
