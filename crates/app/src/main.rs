mod terminal;

use std::fmt;
use std::time::Duration;

use quiz_core::QuizSettings;
use quiz_core::model::{ExerciseId, Subject};
use services::{Clock, QuizLoopService};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidExerciseId { raw: String },
    InvalidAdvanceMs { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidExerciseId { raw } => write!(f, "invalid --exercise value: {raw}"),
            ArgsError::InvalidAdvanceMs { raw } => write!(f, "invalid --advance-ms value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--exercise <id>] [--advance-ms <ms>]");
    eprintln!("  cargo run -p app -- --list");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --exercise 1      (Цифры)");
    eprintln!("  --advance-ms 2000");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DANABALA_EXERCISE, DANABALA_ADVANCE_MS, RUST_LOG");
    eprintln!();
    eprintln!("While playing: type an option to answer, :s to hear the prompt,");
    eprintln!(":r to restart, :q to quit.");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Play {
        exercise_id: ExerciseId,
        advance_delay: Duration,
    },
    List,
    Help,
}

fn parse_exercise_id(raw: String) -> Result<ExerciseId, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidExerciseId { raw })
}

fn parse_advance_ms(raw: String) -> Result<Duration, ArgsError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ArgsError::InvalidAdvanceMs { raw })
}

impl Command {
    /// Env vars give the defaults; flags override them.
    fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut exercise_id = env("DANABALA_EXERCISE")
            .map(parse_exercise_id)
            .transpose()?
            .unwrap_or(ExerciseId::new(1));
        let mut advance_delay = env("DANABALA_ADVANCE_MS")
            .map(parse_advance_ms)
            .transpose()?
            .unwrap_or_else(|| QuizSettings::default().auto_advance_delay());

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--exercise" => {
                    exercise_id = parse_exercise_id(require_value(&mut args, "--exercise")?)?;
                }
                "--advance-ms" => {
                    advance_delay = parse_advance_ms(require_value(&mut args, "--advance-ms")?)?;
                }
                "--list" => return Ok(Self::List),
                "--help" | "-h" => return Ok(Self::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self::Play {
            exercise_id,
            advance_delay,
        })
    }
}

fn print_catalogue() {
    for subject in Subject::ALL {
        println!("{} [{}]", subject.name(), subject.color());
        for exercise in subject.exercises() {
            let playable = if exercise.topic().is_some() { "" } else { "  (скоро)" };
            println!(
                "  {:>2}. {} ({}) - {}{playable}",
                exercise.id(),
                exercise.title(),
                exercise.difficulty().label(),
                exercise.description(),
            );
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let command = Command::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
        .inspect_err(|e| {
            eprintln!("{e}");
            print_usage();
        })?;

    match command {
        Command::Help => {
            print_usage();
            Ok(())
        }
        Command::List => {
            print_catalogue();
            Ok(())
        }
        Command::Play {
            exercise_id,
            advance_delay,
        } => {
            let settings = QuizSettings::default().with_auto_advance_delay(advance_delay)?;
            log::info!("auto advance after {advance_delay:?}");
            let quiz_loop = QuizLoopService::new(Clock::default_clock(), settings);
            terminal::play(&quiz_loop, exercise_id).await
        }
    }
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
