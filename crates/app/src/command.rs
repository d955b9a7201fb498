use std::fmt;

use quiz_core::model::{CategoryId, ConfigUpdate};
use services::{Direction, QuizIntent};

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(QuizIntent),
    /// 1-based index into the answer choices on screen.
    Pick(usize),
    Categories,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    MissingValue { command: &'static str },
    InvalidNumber { raw: String },
    Unknown(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "type a command (or `help`)"),
            CommandError::MissingValue { command } => write!(f, "{command} requires a value"),
            CommandError::InvalidNumber { raw } => write!(f, "not a number: {raw}"),
            CommandError::Unknown(cmd) => write!(f, "unknown command: {cmd}"),
        }
    }
}

impl std::error::Error for CommandError {}

pub const HELP: &str = "\
Commands:
  count <n>          number of questions (clamped to 1..50)
  category <id>      category id (see `categories`)
  difficulty <d>     easy | medium | hard
  start              fetch questions and begin
  pick <n>           choose answer n for the current question
  next | prev        move between questions
  submit             score the quiz
  dismiss            leave the error screen, keeping settings
  reset              start over with default settings
  categories         list categories
  help | quit";

impl Command {
    /// Parse one input line.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` for empty, unknown, or malformed commands.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(CommandError::Empty);
        };
        let rest = parts.collect::<Vec<_>>().join(" ");

        let command = match head.to_ascii_lowercase().as_str() {
            "count" => {
                let n = parse_number::<i64>(&rest, "count")?;
                Command::Intent(QuizIntent::Configure(ConfigUpdate::new().question_count(n)))
            }
            "category" => {
                let id = parse_number::<CategoryId>(&rest, "category")?;
                Command::Intent(QuizIntent::Configure(ConfigUpdate::new().category(id)))
            }
            "difficulty" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingValue {
                        command: "difficulty",
                    });
                }
                Command::Intent(QuizIntent::Configure(ConfigUpdate::new().difficulty(rest)))
            }
            "start" => Command::Intent(QuizIntent::Start),
            "pick" => Command::Pick(parse_number::<usize>(&rest, "pick")?),
            "next" | "n" => Command::Intent(QuizIntent::Navigate(Direction::Next)),
            "prev" | "previous" | "p" => Command::Intent(QuizIntent::Navigate(Direction::Previous)),
            "submit" => Command::Intent(QuizIntent::Submit),
            "dismiss" => Command::Intent(QuizIntent::DismissError),
            "reset" => Command::Intent(QuizIntent::Reset),
            "categories" => Command::Categories,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_owned())),
        };
        Ok(command)
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, command: &'static str) -> Result<T, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::MissingValue { command });
    }
    raw.parse::<T>().map_err(|_| CommandError::InvalidNumber {
        raw: raw.to_owned(),
    })
}
