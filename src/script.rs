//! Line-oriented command scripts.
//!
//! The CLI drives a selection from a plain text script, one command per
//! line. The same syntax is accepted interactively by `salad-builder shell`.
//!
//! ```text
//! # build a chicken caesar
//! add ruccola
//! add kyckling 90        # explicit grams
//! spoons kyckling 4
//! grams caesardressing 30
//! toggle kyckling
//! pick fetaost           # add if missing, remove if present
//! remove ruccola
//! show                   # print the nutrition report here
//! clear
//! ```
//!
//! Parsing is purely syntactic. Numbers may be negative; clamping them is the
//! selection store's job, not the parser's.

use std::fmt;
use thiserror::Error;

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Add { id: String, grams: Option<f64> },
    Remove { id: String },
    Grams { id: String, grams: f64 },
    Spoons { id: String, spoons: i64 },
    Toggle { id: String },
    Pick { id: String },
    Clear,
    Show,
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptCommand::Add { id, grams: None } => write!(f, "add {id}"),
            ScriptCommand::Add {
                id,
                grams: Some(g),
            } => write!(f, "add {id} {g}"),
            ScriptCommand::Remove { id } => write!(f, "remove {id}"),
            ScriptCommand::Grams { id, grams } => write!(f, "grams {id} {grams}"),
            ScriptCommand::Spoons { id, spoons } => write!(f, "spoons {id} {spoons}"),
            ScriptCommand::Toggle { id } => write!(f, "toggle {id}"),
            ScriptCommand::Pick { id } => write!(f, "pick {id}"),
            ScriptCommand::Clear => f.write_str("clear"),
            ScriptCommand::Show => f.write_str("show"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptErrorKind {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("'{command}' needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("'{value}' is not a valid {what}")]
    InvalidNumber { value: String, what: &'static str },
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

/// A parse failure, tagged with its 1-based line number.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line}: {kind}")]
pub struct ScriptError {
    pub line: usize,
    pub kind: ScriptErrorKind,
}

/// Parse a single line. Blank lines and comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, ScriptErrorKind> {
    let content = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let mut words = content.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" => {
            let id = require(words.next(), "add", "an ingredient id")?;
            let grams = words.next().map(parse_grams).transpose()?;
            ScriptCommand::Add { id, grams }
        }
        "remove" | "rm" => ScriptCommand::Remove {
            id: require(words.next(), "remove", "an ingredient id")?,
        },
        "grams" => {
            let id = require(words.next(), "grams", "an ingredient id")?;
            let grams = parse_grams(&require(words.next(), "grams", "a gram amount")?)?;
            ScriptCommand::Grams { id, grams }
        }
        "spoons" => {
            let id = require(words.next(), "spoons", "an ingredient id")?;
            let raw = require(words.next(), "spoons", "a spoon count")?;
            let spoons = raw.parse::<i64>().map_err(|_| ScriptErrorKind::InvalidNumber {
                value: raw.clone(),
                what: "spoon count",
            })?;
            ScriptCommand::Spoons { id, spoons }
        }
        "toggle" => ScriptCommand::Toggle {
            id: require(words.next(), "toggle", "an ingredient id")?,
        },
        "pick" => ScriptCommand::Pick {
            id: require(words.next(), "pick", "an ingredient id")?,
        },
        "clear" => ScriptCommand::Clear,
        "show" => ScriptCommand::Show,
        other => return Err(ScriptErrorKind::UnknownCommand(other.to_string())),
    };

    match words.next() {
        Some(extra) => Err(ScriptErrorKind::UnexpectedArgument(extra.to_string())),
        None => Ok(Some(command)),
    }
}

/// Parse a whole script, stopping at the first bad line.
pub fn parse_script(source: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (i, line) in source.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(command)) => commands.push(command),
            Ok(None) => {}
            Err(kind) => return Err(ScriptError { line: i + 1, kind }),
        }
    }
    Ok(commands)
}

fn require(
    word: Option<&str>,
    command: &'static str,
    what: &'static str,
) -> Result<String, ScriptErrorKind> {
    word.map(str::to_string)
        .ok_or(ScriptErrorKind::MissingArgument { command, what })
}

fn parse_grams(raw: &str) -> Result<f64, ScriptErrorKind> {
    raw.parse::<f64>()
        .ok()
        .filter(|g| g.is_finite())
        .ok_or_else(|| ScriptErrorKind::InvalidNumber {
            value: raw.to_string(),
            what: "gram amount",
        })
}
