mod command;
mod render;

use std::fmt;

use services::{
    Clock, OpenTriviaClient, OpenTriviaConfig, QuestionSource, QuizController, QuizError,
    QuizIntent,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing_subscriber::EnvFilter;

use crate::command::{Command, HELP};
use crate::render::{render, render_categories};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
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
    eprintln!("  cargo run -p app -- [--base-url <url>] [--seed <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --base-url {}", OpenTriviaConfig::DEFAULT_BASE_URL);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_API_BASE_URL, RUST_LOG");
}

struct Args {
    source: OpenTriviaConfig,
    seed: Option<u64>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut source = OpenTriviaConfig::from_env();
        let mut seed = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--base-url" => {
                    source.base_url = require_value(args, "--base-url")?;
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed = value
                        .parse::<u64>()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self { source, seed }))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn emit(stdout: &mut Stdout, text: &str) -> std::io::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}

/// Run a start request in two steps so the loading screen is shown while waiting.
async fn start(
    quiz: &mut QuizController,
    source: &dyn QuestionSource,
    stdout: &mut Stdout,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = match quiz.begin_start() {
        Ok(request) => request,
        Err(err) => {
            emit(stdout, &format!("! {err}\n")).await?;
            return Ok(());
        }
    };
    emit(stdout, &render(&quiz.snapshot())).await?;
    let outcome = source.fetch(&request).await;
    if let Err(err) = quiz.complete_start(outcome) {
        tracing::debug!(error = %err, "start failed");
    }
    Ok(())
}

async fn handle(
    quiz: &mut QuizController,
    source: &dyn QuestionSource,
    command: Command,
    stdout: &mut Stdout,
) -> Result<(), Box<dyn std::error::Error>> {
    let intent = match command {
        Command::Intent(QuizIntent::Start) => return start(quiz, source, stdout).await,
        Command::Intent(intent) => intent,
        Command::Pick(number) => {
            let choice = quiz
                .snapshot()
                .question
                .and_then(|view| view.choices.get(number.wrapping_sub(1)).cloned());
            match choice {
                Some(answer) => QuizIntent::SelectAnswer(answer),
                None => {
                    emit(stdout, &format!("! no answer #{number} here\n")).await?;
                    return Ok(());
                }
            }
        }
        Command::Categories => return Ok(emit(stdout, &render_categories()).await?),
        Command::Help => return Ok(emit(stdout, &format!("{HELP}\n")).await?),
        Command::Quit => return Ok(()),
    };

    match quiz.apply(intent, source).await {
        Ok(_) => {}
        Err(err @ (QuizError::InsufficientQuestions { .. } | QuizError::Transport { .. })) => {
            tracing::debug!(error = %err, "load failed");
        }
        Err(err) => emit(stdout, &format!("! {err}\n")).await?,
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let Some(args) = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?
    else {
        print_usage();
        return Ok(());
    };

    init_tracing();
    tracing::info!(base_url = %args.source.base_url, "quiz host starting");

    let client = OpenTriviaClient::new(args.source);
    let mut quiz = QuizController::new(Clock::system());
    if let Some(seed) = args.seed {
        quiz = quiz.with_seed(seed);
    }

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    emit(&mut stdout, &render(&quiz.snapshot())).await?;

    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(err) => {
                emit(&mut stdout, &format!("! {err}\n")).await?;
                continue;
            }
        };
        let redraw = matches!(command, Command::Intent(_) | Command::Pick(_));
        handle(&mut quiz, &client, command, &mut stdout).await?;
        if redraw {
            emit(&mut stdout, &render(&quiz.snapshot())).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
