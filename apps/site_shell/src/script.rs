//! Line-oriented interaction scripts for the headless shell.
//!
//! One command per line; blank lines and `#` comments are skipped.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(String),
    Article(String),
    Study(String),
    AllArticles,
    AllStudies,
    Close,
    Back,
    Forward,
    Scroll(String),
    Overlay(bool),
    Wait(Duration),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Go(_) => "go",
            Command::Article(_) => "article",
            Command::Study(_) => "study",
            Command::AllArticles => "all-articles",
            Command::AllStudies => "all-studies",
            Command::Close => "close",
            Command::Back => "back",
            Command::Forward => "forward",
            Command::Scroll(_) => "scroll",
            Command::Overlay(_) => "overlay",
            Command::Wait(_) => "wait",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: '{command}' needs an argument")]
    MissingArgument { line: usize, command: &'static str },
    #[error("line {line}: invalid argument '{argument}' for '{command}'")]
    InvalidArgument {
        line: usize,
        command: &'static str,
        argument: String,
    },
}

pub fn parse_script(raw: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        if let Some(command) = parse_line(index + 1, line)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

fn parse_line(line: usize, raw: &str) -> Result<Option<Command>, ScriptError> {
    let raw = raw.split('#').next().unwrap_or_default().trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let (word, argument) = match raw.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, Some(rest.trim())),
        None => (raw, None),
    };
    let required = |command: &'static str| {
        argument
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or(ScriptError::MissingArgument { line, command })
    };
    let invalid = |command: &'static str, argument: &str| ScriptError::InvalidArgument {
        line,
        command,
        argument: argument.to_string(),
    };

    let command = match word {
        "go" => Command::Go(required("go")?),
        "article" => Command::Article(required("article")?),
        "study" => Command::Study(required("study")?),
        "all-articles" => Command::AllArticles,
        "all-studies" => Command::AllStudies,
        "close" => Command::Close,
        "back" => Command::Back,
        "forward" => Command::Forward,
        "scroll" => Command::Scroll(required("scroll")?),
        "overlay" => match required("overlay")?.as_str() {
            "open" | "on" => Command::Overlay(true),
            "closed" | "close" | "off" => Command::Overlay(false),
            other => return Err(invalid("overlay", other)),
        },
        "wait" => {
            let value = required("wait")?;
            let millis = value
                .trim_end_matches("ms")
                .parse::<u64>()
                .map_err(|_| invalid("wait", &value))?;
            Command::Wait(Duration::from_millis(millis))
        }
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            })
        }
    };
    Ok(Some(command))
}
