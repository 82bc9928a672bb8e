use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use buscaminas_core::*;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use tracing_subscriber::EnvFilter;
use web_time::Instant;

use command::Command;

mod command;
mod render;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity,

    /// Player name, asked for when missing
    #[arg(short, long)]
    name: Option<String>,

    /// Difficulty of the first game: easy, medium or hard
    #[arg(short, long, default_value_t = DifficultyPreset::Easy)]
    difficulty: DifficultyPreset,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory holding the ranking, defaults to the user data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Start with sound feedback off
    #[arg(short, long)]
    muted: bool,
}

/// Rings the terminal bell at the end of a game.
struct Bell;

impl Feedback for Bell {
    fn on_win(&mut self) {
        eprint!("\x07");
    }

    fn on_loss(&mut self) {
        eprint!("\x07\x07");
    }
}

/// Turns wall-clock time into the once-per-second ticks the session expects.
struct Clock {
    last: Instant,
    carry: Duration,
}

impl Clock {
    const TICK: Duration = Duration::from_secs(1);

    fn new() -> Self {
        Self {
            last: Instant::now(),
            carry: Duration::ZERO,
        }
    }

    /// Delivers the ticks that elapsed since the previous call.
    fn catch_up<S: RankingStore, P: MinePlacer>(&mut self, session: &mut GameSession<S, P>) {
        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;

        if !session.is_timer_running() {
            self.carry = Duration::ZERO;
            return;
        }

        self.carry += elapsed;
        while self.carry >= Self::TICK {
            self.carry -= Self::TICK;
            session.tick();
        }
    }
}

fn init_logging(verbose: &Verbosity) {
    let filter = EnvFilter::builder()
        .with_default_directive(verbose.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .init();
}

fn prompt(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}

fn print_board<S: RankingStore, P: MinePlacer>(session: &GameSession<S, P>) {
    print!("{}", render::BoardView(&session.snapshot()));
}

fn print_ranking<S: RankingStore, P: MinePlacer>(session: &GameSession<S, P>) {
    let view = render::RankingView {
        label: session.preset().label(),
        entries: session.ranking(),
    };
    print!("{view}");
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    let data_dir = args
        .data_dir
        .or_else(|| dirs::data_dir().map(|dir| dir.join("buscaminas")))
        .context("Could not find a data directory, pass --data-dir")?;
    let store = JsonFileRankingStore::in_dir(&data_dir);
    log::debug!("ranking file: {}", store.path().display());

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let mut session = GameSession::new(store, RandomMinePlacer::new(seed))
        .with_difficulty(args.difficulty)
        .with_feedback(Bell);
    session.set_muted(args.muted);

    let mut lines = io::stdin().lock().lines();

    let mut name = args.name;
    loop {
        let candidate = match name.take() {
            Some(name) => name,
            None => {
                prompt("name: ")?;
                match lines.next() {
                    Some(line) => line?,
                    None => return Ok(()),
                }
            }
        };
        match session.start(&candidate) {
            Ok(()) => break,
            Err(err) => eprintln!("{err}, please enter your name"),
        }
    }

    let mut clock = Clock::new();
    print_board(&session);
    print_ranking(&session);
    println!("{}", command::HELP);

    loop {
        prompt("> ")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        clock.catch_up(&mut session);

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };
        log::debug!("command: {:?}", command);

        match command {
            Command::Open(coords) => match session.activate(coords) {
                ActivateOutcome::Won { rank } => {
                    print_board(&session);
                    if let Some(rank) = rank {
                        println!("new best time at position {}", rank + 1);
                    }
                    print_ranking(&session);
                    continue;
                }
                outcome if !outcome.has_update() => {
                    println!("cannot open {:?} now", coords);
                    continue;
                }
                _ => {}
            },
            Command::Flag(coords) => {
                if !session.toggle_flag(coords).has_update() {
                    println!("cannot flag {:?} now", coords);
                    continue;
                }
            }
            Command::Pause => {
                session.toggle_pause();
            }
            Command::Reset => session.reset(),
            Command::Difficulty(preset) => {
                session.change_difficulty(preset);
                print_ranking(&session);
            }
            Command::Mute => {
                let muted = session.toggle_mute();
                println!("sound {}", if muted { "off" } else { "on" });
                continue;
            }
            Command::Ranking => {
                print_ranking(&session);
                continue;
            }
            Command::Help => {
                println!("{}", command::HELP);
                continue;
            }
            Command::Quit => break,
        }

        print_board(&session);
    }

    Ok(())
}
