//! Headless Blockfall runner (default binary).
//!
//! Drives a session with a simulated 16ms clock and a seeded bot that presses and
//! releases commands through the repeat handler, then prints the final board.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use log::info;

use blockfall::core::{EngineConfig, GameSession, LogSink, RandomSource, SimpleRng};
use blockfall::input::RepeatHandler;
use blockfall::types::{Command, SessionState, EMPTY, TICK_MS};

const DEFAULT_SEED: u32 = 1;
const DEFAULT_MAX_TICKS: u64 = 100_000;

/// Ticks between bot decisions (~200ms, long enough for DAS to kick in)
const BOT_PERIOD_TICKS: u64 = 12;

/// Weighted bot choices; sideways moves dominate so pieces spread out.
const BOT_COMMANDS: [Command; 8] = [
    Command::MoveLeft,
    Command::MoveLeft,
    Command::MoveRight,
    Command::MoveRight,
    Command::Rotate,
    Command::SoftDrop,
    Command::HardDrop,
    Command::HardDrop,
];

#[derive(Debug, Clone)]
struct Cli {
    config_path: Option<PathBuf>,
    seed: u32,
    max_ticks: u64,
    dump_config: bool,
    help: bool,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config_path: None,
            seed: DEFAULT_SEED,
            max_ticks: DEFAULT_MAX_TICKS,
            dump_config: false,
            help: false,
        }
    }
}

fn print_help() {
    println!(
        "Usage: blockfall [--config PATH] [--seed N] [--max-ticks N] [--dump-config]\n\
         \n\
         Runs a headless autoplay session and prints the final board.\n\
         \n\
         Options:\n  \
           --config PATH    Load engine config from PATH (default: $BLOCKFALL_CONFIG or the user config dir)\n  \
           --seed N         Seed for piece generation and the bot (default: {DEFAULT_SEED})\n  \
           --max-ticks N    Stop after N simulated frames (default: {DEFAULT_MAX_TICKS})\n  \
           --dump-config    Print the effective config as TOML and exit\n  \
           -h, --help       Show this help"
    );
}

fn parse_cli() -> Result<Cli> {
    let mut cli = Cli::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => cli.help = true,
            "--dump-config" => cli.dump_config = true,
            "--config" => {
                let path = args.next().ok_or_else(|| anyhow!("--config requires a path"))?;
                cli.config_path = Some(PathBuf::from(path));
            }
            "--seed" => {
                let value = args.next().ok_or_else(|| anyhow!("--seed requires a value"))?;
                cli.seed = value
                    .parse()
                    .with_context(|| format!("invalid --seed value {value:?}"))?;
            }
            "--max-ticks" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("--max-ticks requires a value"))?;
                cli.max_ticks = value
                    .parse()
                    .with_context(|| format!("invalid --max-ticks value {value:?}"))?;
            }
            other => bail!("unknown argument: {other} (try --help)"),
        }
    }

    Ok(cli)
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    match &cli.config_path {
        Some(path) => EngineConfig::load_from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => EngineConfig::load().context("failed to load config"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = parse_cli()?;
    if cli.help {
        print_help();
        return Ok(());
    }

    let config = load_config(&cli)?;
    if cli.dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    run(config, cli.seed, cli.max_ticks)
}

fn run(config: EngineConfig, seed: u32, max_ticks: u64) -> Result<()> {
    let input = config.input.clone();
    let mut session = GameSession::new(config, SimpleRng::new(seed))
        .context("invalid engine config")?
        .with_sink(LogSink);
    let mut repeat = RepeatHandler::with_config(input.das_ms, input.arr_ms, input.soft_drop_repeat_ms);
    let mut bot = SimpleRng::new(seed.rotate_left(16) ^ 0x9E37_79B9);

    info!("starting autoplay with seed {seed}");
    session.apply(Command::Start);

    let mut now_ms: u64 = 0;
    let mut ticks: u64 = 0;
    while ticks < max_ticks && session.state() != SessionState::GameOver {
        if ticks % BOT_PERIOD_TICKS == 0 {
            // Let go of whatever was held before choosing the next command.
            repeat.reset();
            let command = BOT_COMMANDS[bot.next_index(BOT_COMMANDS.len())];
            if let Some(command) = repeat.press(command) {
                session.apply(command);
            }
        }

        for command in repeat.update(TICK_MS, session.state()) {
            session.apply(command);
        }
        session.tick(now_ms);

        now_ms += TICK_MS as u64;
        ticks += 1;
    }

    info!(
        "stopped after {ticks} ticks ({}ms simulated), state {}",
        now_ms,
        session.state().as_str()
    );

    let grid = session.grid();
    for row in grid.cells().chunks(grid.columns() as usize) {
        let line: String = row
            .iter()
            .map(|&c| if c == EMPTY { '.' } else { '#' })
            .collect();
        println!("{line}");
    }
    println!(
        "score: {}  lines: {}  level: {}  state: {}",
        session.score(),
        session.lines(),
        session.level(),
        session.state().as_str()
    );

    Ok(())
}
