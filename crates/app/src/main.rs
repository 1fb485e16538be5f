use std::fmt;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::Arc;

use edu_core::model::{SessionKind, SourceId};
use services::tutor::{
    ENV_TUTOR_LEVEL, ENV_TUTOR_SUBJECT, answering_service_for, settings_from_lookup,
};
use services::{Clock, MockAnsweringService, StudyLoopService, TutorChat};
use storage::catalog::{MATH_DECK, MATH_QUIZ};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod terminal;

const ENV_SHUFFLE: &str = "EDU_SHUFFLE";
const ENV_LISTEN_ADDR: &str = "EDU_LISTEN_ADDR";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSourceId { raw: String },
    InvalidAddr { raw: String },
    MissingQuestion,
    WrongSourceKind { id: SourceId, kind: SessionKind },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSourceId { raw } => write!(f, "invalid --source value: {raw}"),
            ArgsError::InvalidAddr { raw } => write!(f, "invalid --addr value: {raw}"),
            ArgsError::MissingQuestion => write!(f, "ask needs a question"),
            ArgsError::WrongSourceKind { id, kind } => {
                write!(f, "source {id} holds {kind}, not what this command studies")
            }
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
    eprintln!("  cargo run -p app -- list");
    eprintln!("  cargo run -p app -- quiz       [--source <id>] [--shuffle]");
    eprintln!("  cargo run -p app -- flashcards [--source <id>] [--shuffle]");
    eprintln!("  cargo run -p app -- ask <question...> [--subject <name>] [--level <name>]");
    eprintln!("  cargo run -p app -- tutor      [--subject <name>] [--level <name>]");
    eprintln!("  cargo run -p app -- serve      [--addr <host:port>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  quiz --source {MATH_QUIZ}, flashcards --source {MATH_DECK}");
    eprintln!("  serve --addr {DEFAULT_LISTEN_ADDR}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EDU_SHUFFLE, EDU_LISTEN_ADDR, EDU_ASK_BASE_URL, EDU_TUTOR_SUBJECT,");
    eprintln!("  EDU_TUTOR_LEVEL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    List,
    Quiz,
    Flashcards,
    Ask,
    Tutor,
    Serve,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "list" => Some(Self::List),
            "quiz" => Some(Self::Quiz),
            "flashcards" => Some(Self::Flashcards),
            "ask" => Some(Self::Ask),
            "tutor" => Some(Self::Tutor),
            "serve" => Some(Self::Serve),
            _ => None,
        }
    }

    fn study_kind(self) -> Option<SessionKind> {
        match self {
            Self::Quiz => Some(SessionKind::Quiz),
            Self::Flashcards => Some(SessionKind::Flashcard),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    source: Option<SourceId>,
    shuffle: bool,
    subject: Option<String>,
    level: Option<String>,
    addr: SocketAddr,
    question: Vec<String>,
}

impl Args {
    fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let shuffle = env(ENV_SHUFFLE).is_some_and(|value| is_truthy(&value));
        let raw_addr = env(ENV_LISTEN_ADDR).unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into());
        let mut parsed = Self {
            source: None,
            shuffle,
            subject: None,
            level: None,
            addr: parse_addr(raw_addr)?,
            question: Vec::new(),
        };

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--source" => {
                    let value = require_value(&mut args, "--source")?;
                    let id = value
                        .parse::<SourceId>()
                        .map_err(|_| ArgsError::InvalidSourceId { raw: value.clone() })?;
                    parsed.source = Some(id);
                }
                "--shuffle" => parsed.shuffle = true,
                "--subject" => parsed.subject = Some(require_value(&mut args, "--subject")?),
                "--level" => parsed.level = Some(require_value(&mut args, "--level")?),
                "--addr" => parsed.addr = parse_addr(require_value(&mut args, "--addr")?)?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => parsed.question.push(arg),
            }
        }

        Ok(parsed)
    }
}

fn parse_addr(raw: String) -> Result<SocketAddr, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidAddr { raw })
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(());
        }
        Some(first) if matches!(first.as_str(), "--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let parsed = Args::parse(argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();
    let clock = Clock::system();

    match cmd {
        Command::List => {
            let storage = Storage::seeded().await?;
            let study = StudyLoopService::new(clock, Arc::clone(&storage.sources));
            let mut out = io::stdout().lock();
            for listing in study.list_sources(None).await? {
                writeln!(
                    out,
                    "{:>3}  {:<10}  {:<32}  {} items",
                    listing.id.value(),
                    listing.kind.to_string(),
                    listing.title,
                    listing.item_count
                )?;
            }
            Ok(())
        }
        Command::Quiz | Command::Flashcards => {
            let expected = cmd.study_kind().unwrap_or(SessionKind::Quiz);
            let source_id = parsed.source.unwrap_or(match expected {
                SessionKind::Quiz => MATH_QUIZ,
                SessionKind::Flashcard => MATH_DECK,
            });

            let storage = Storage::seeded().await?;
            let study = StudyLoopService::new(clock, Arc::clone(&storage.sources))
                .with_shuffle(parsed.shuffle);
            let (listing, mut runner) = study.start_session(source_id).await?;
            if listing.kind != expected {
                return Err(ArgsError::WrongSourceKind {
                    id: listing.id,
                    kind: listing.kind,
                }
                .into());
            }

            let mut input = io::stdin().lock();
            let mut out = io::stdout().lock();
            terminal::study(&mut runner, &listing.title, &mut input, &mut out)?;
            Ok(())
        }
        Command::Ask | Command::Tutor => {
            let settings = settings_from_lookup(|key| match key {
                ENV_TUTOR_SUBJECT if parsed.subject.is_some() => parsed.subject.clone(),
                ENV_TUTOR_LEVEL if parsed.level.is_some() => parsed.level.clone(),
                _ => std::env::var(key).ok(),
            })?;
            let mut chat = TutorChat::new(answering_service_for(&settings), clock, &settings);
            let mut out = io::stdout().lock();

            if cmd == Command::Ask {
                if parsed.question.is_empty() {
                    return Err(ArgsError::MissingQuestion.into());
                }
                terminal::ask_once(&mut chat, &parsed.question.join(" "), &mut out).await
            } else {
                let mut input = io::stdin().lock();
                terminal::run_tutor(&mut chat, &mut input, &mut out).await
            }
        }
        Command::Serve => {
            let listener = tokio::net::TcpListener::bind(parsed.addr).await?;
            api::serve(listener, Arc::new(MockAnsweringService)).await?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
