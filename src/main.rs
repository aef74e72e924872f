use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wormhole_chess::board::board::Board;
use wormhole_chess::board::tile_names::canonical_tile_name;
use wormhole_chess::board::topology::{BoardSize, Variant};
use wormhole_chess::chess_errors::{ChessError, ConfigurationError};
use wormhole_chess::controller::game_controller::{AgentSettings, GameController};
use wormhole_chess::game_state::chess_types::Move;
use wormhole_chess::game_state::game_config::GameConfig;
use wormhole_chess::game_state::game_state::{GameState, Turn};
use wormhole_chess::game_state::players::{create_players, default_teams, ControllerKind};
use wormhole_chess::game_state::starting_position::{default_position, load_position_file};
use wormhole_chess::move_generation::legal_move_generator::LegalMoveGenerator;
use wormhole_chess::move_generation::perft::perft_multi_threaded;
use wormhole_chess::search::threading::SearchBudget;
use wormhole_chess::utils::render_game_state::render_game_state;

#[derive(Parser, Debug)]
#[command(name = "wormhole_chess", version, about = "Two- and four-player wormhole chess")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game; engine seats move on their own, humans type `e2T-e4T`.
    Play(PlayArgs),
    /// Count move-tree leaves from the starting position.
    Perft(PerftArgs),
}

#[derive(Args, Debug)]
struct BoardArgs {
    #[arg(long, default_value = "wormhole")]
    variant: Variant,
    /// Side length of each sheet (6 or 8).
    #[arg(long, default_value_t = 8)]
    size: u8,
    /// Position document to start from instead of the built-in layout.
    #[arg(long)]
    position: Option<PathBuf>,
    /// Directory for the topology/pattern cache.
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    board: BoardArgs,
    /// Controller per seat, e.g. `human,mc` or `random,random,mc,mc`.
    #[arg(long, value_delimiter = ',')]
    players: Vec<ControllerKind>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 120)]
    max_turns: usize,
    /// Clock per player in seconds.
    #[arg(long, default_value_t = 600)]
    turn_time: i64,
    /// Monte-Carlo simulations per move.
    #[arg(long, default_value_t = 1_000)]
    simulations: u64,
    /// Monte-Carlo time limit per move, 0 for none.
    #[arg(long, default_value_t = 1_000)]
    move_time_ms: u64,
    #[arg(long)]
    threads: Option<usize>,
    /// Only print the final board.
    #[arg(long)]
    quiet: bool,
}

#[derive(Args, Debug)]
struct PerftArgs {
    #[command(flatten)]
    board: BoardArgs,
    #[arg(long, default_value_t = 3)]
    depth: u8,
    /// Number of participants (2 or 4).
    #[arg(long)]
    players: Option<usize>,
}

/// Everything the command line can fail with.
#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Chess(#[from] ChessError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("terminal io: {0}")]
    Io(#[from] io::Error),
}

type CliResult<T> = Result<T, CliError>;

fn default_player_count(variant: Variant) -> usize {
    match variant {
        Variant::Normal => 2,
        Variant::Wormhole => 4,
    }
}

fn game_config(args: &BoardArgs) -> GameConfig {
    GameConfig {
        cache_dir: args.cache_dir.clone(),
        ..GameConfig::default()
    }
}

fn build_board(args: &BoardArgs, config: &GameConfig) -> CliResult<Arc<Board>> {
    Ok(Board::build(
        BoardSize::square(args.size),
        args.variant,
        config.cache_dir.as_deref(),
    )?)
}

fn read_position_document(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|source| {
        ConfigurationError::PositionFile {
            path: path.display().to_string(),
            source,
        }
        .into()
    })
}

/// Accepts `from-to` or `from to`, in full or compact tile names.
fn parse_human_move(game: &GameState, input: &str) -> Option<Move> {
    let board = game.board();
    let mut parts = input.split(|c: char| c == '-' || c.is_whitespace()).filter(|s| !s.is_empty());
    let tile = |raw: &str| {
        let name = canonical_tile_name(raw, board.variant()).ok()?;
        board.tile_id(&name)
    };
    let from = tile(parts.next()?)?;
    let to = tile(parts.next()?)?;
    game.legal_moves().iter().copied().find(|m| m.from == from && m.to == to)
}

fn run_play(args: PlayArgs) -> CliResult<()> {
    let variant = args.board.variant;
    let controllers = if args.players.is_empty() {
        vec![ControllerKind::Random; default_player_count(variant)]
    } else {
        args.players.clone()
    };
    let players = create_players(variant, &controllers)?;
    let config = GameConfig {
        max_turns: args.max_turns,
        turn_time: chrono::Duration::seconds(args.turn_time),
        ..game_config(&args.board)
    };
    let board = build_board(&args.board, &config)?;
    let document = match &args.board.position {
        Some(path) => Some(read_position_document(path)?),
        None => None,
    };
    let game = GameState::with_board(board, players, document.as_deref(), config)?;

    let mut settings = AgentSettings {
        seed: args.seed,
        budget: SearchBudget {
            simulations: args.simulations,
            move_time: (args.move_time_ms > 0).then(|| Duration::from_millis(args.move_time_ms)),
        },
        ..AgentSettings::default()
    };
    if let Some(threads) = args.threads {
        settings.threads = threads;
    }
    let mut ctl = GameController::new(game, &settings);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !ctl.game().is_finished() {
        match ctl.game().get_turn() {
            Turn::Skip => {
                let Some(mv) = ctl.play_bot_turn()? else {
                    continue;
                };
                if !args.quiet {
                    println!("{}", ctl.game().board().describe_move(mv));
                    println!("{}\n", render_game_state(ctl.game()));
                }
            }
            Turn::Play(seat) => {
                println!("{}", render_game_state(ctl.game()));
                print!("seat {seat} move> ");
                io::stdout().flush()?;
                let Some(line) = lines.next() else {
                    info!("input closed, leaving the game");
                    return Ok(());
                };
                let line = line?;
                match parse_human_move(ctl.game(), line.trim()) {
                    Some(mv) => {
                        if let Err(e) = ctl.submit_move(mv) {
                            println!("{e}");
                        }
                    }
                    None => println!("not a legal move: {}", line.trim()),
                }
            }
        }
    }

    println!("{}", render_game_state(ctl.game()));
    Ok(())
}

fn run_perft(args: PerftArgs) -> CliResult<()> {
    let variant = args.board.variant;
    let teams = default_teams(variant, args.players.unwrap_or_else(|| default_player_count(variant)))?;
    let config = game_config(&args.board);
    let board = build_board(&args.board, &config)?;
    let position = match &args.board.position {
        Some(path) => load_position_file(&board, path, &teams, &config)?,
        None => default_position(&board, &teams, &config)?,
    };

    for depth in 1..=args.depth {
        let started = std::time::Instant::now();
        let counts = perft_multi_threaded(Arc::new(LegalMoveGenerator), &position, &teams, 0, depth)?;
        println!(
            "depth {depth}: nodes {} captures {} castles {} promotions {} king captures {} ({:.2?})",
            counts.nodes,
            counts.captures,
            counts.castles,
            counts.promotions,
            counts.king_captures,
            started.elapsed()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let outcome = match Cli::parse().command {
        Command::Play(args) => run_play(args),
        Command::Perft(args) => run_perft(args),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
