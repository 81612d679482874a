//! Parsing of the one-line commands typed at the prompt.

use std::str::FromStr;

use thiserror::Error;

pub const HELP: &str = "commands: add <title> | toggle <id> | rm <id> | down [n] | up [n] | more | refresh | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(u64),
    Remove(u64),
    Down(usize),
    Up(usize),
    More,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("a todo needs a title")]
    EmptyTitle,
    #[error("`{0}` is not a todo id")]
    InvalidId(String),
    #[error("`{0}` is not a row count")]
    InvalidCount(String),
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        match verb {
            "" => Err(CommandError::Empty),
            "add" | "a" => {
                if rest.is_empty() {
                    Err(CommandError::EmptyTitle)
                } else {
                    Ok(Command::Add(rest.to_string()))
                }
            }
            "toggle" | "t" => parse_id(rest).map(Command::Toggle),
            "rm" | "delete" | "d" => parse_id(rest).map(Command::Remove),
            "down" | "j" => parse_count(rest).map(Command::Down),
            "up" | "k" => parse_count(rest).map(Command::Up),
            "more" | "m" => Ok(Command::More),
            "refresh" | "r" => Ok(Command::Refresh),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_id(raw: &str) -> Result<u64, CommandError> {
    raw.trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidId(raw.to_string()))
}

/// Scroll distance; one row when omitted.
fn parse_count(raw: &str) -> Result<usize, CommandError> {
    if raw.is_empty() {
        return Ok(1);
    }
    raw.parse()
        .map_err(|_| CommandError::InvalidCount(raw.to_string()))
}
