//! Line-oriented text form of session commands, as typed on stdin or kept in a script.
//!
//! One command per line; `#` starts a comment. `wait` lines only move the run clock.

use std::time::Duration;

use crawler_core::{Attribute, CombatAction, Command, Direction};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Command(Command),
    Wait(Duration),
    Blank,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{verb}' needs {expected}")]
    MissingArgument { verb: String, expected: &'static str },
    #[error("'{arg}' is not a valid argument for '{verb}'")]
    BadArgument { verb: String, arg: String },
}

pub fn parse_line(line: &str) -> Result<Line, ParseError> {
    let text = line.split('#').next().unwrap_or_default().trim().to_ascii_lowercase();
    let mut words = text.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Line::Blank);
    };
    let arg = words.next();

    let command = match verb {
        "n" | "north" => Command::Move(Direction::North),
        "s" | "south" => Command::Move(Direction::South),
        "e" | "east" => Command::Move(Direction::East),
        "w" | "west" => Command::Move(Direction::West),
        "go" | "move" => Command::Move(direction(verb, required(verb, arg, "a direction")?)?),
        "a" | "attack" => Command::Combat(CombatAction::Attack),
        "h" | "heal" => Command::Combat(CombatAction::Heal),
        "f" | "flee" => Command::Combat(CombatAction::Flee),
        "shop" => Command::OpenShop,
        "close" | "leave" => Command::CloseShop,
        "buy" => {
            let index = required(verb, arg, "a shop index")?;
            Command::Purchase(index.parse().map_err(|_| bad(verb, index))?)
        }
        "level" | "lvl" => {
            Command::ChooseAttribute(attribute(verb, required(verb, arg, "an attribute")?)?)
        }
        "class" => Command::SelectClass(required(verb, arg, "a class name")?.to_string()),
        "start" | "confirm" | "descend" => Command::ConfirmStart,
        "menu" => Command::ReturnToMenu,
        "q" | "quit" => Command::Quit,
        "wait" => return wait(verb, required(verb, arg, "a duration")?).map(Line::Wait),
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Line::Command(command))
}

fn required<'a>(
    verb: &str,
    arg: Option<&'a str>,
    expected: &'static str,
) -> Result<&'a str, ParseError> {
    arg.ok_or_else(|| ParseError::MissingArgument { verb: verb.to_string(), expected })
}

fn bad(verb: &str, arg: &str) -> ParseError {
    ParseError::BadArgument { verb: verb.to_string(), arg: arg.to_string() }
}

fn direction(verb: &str, arg: &str) -> Result<Direction, ParseError> {
    match arg {
        "n" | "north" => Ok(Direction::North),
        "s" | "south" => Ok(Direction::South),
        "e" | "east" => Ok(Direction::East),
        "w" | "west" => Ok(Direction::West),
        _ => Err(bad(verb, arg)),
    }
}

fn attribute(verb: &str, arg: &str) -> Result<Attribute, ParseError> {
    Attribute::ALL
        .into_iter()
        .find(|attribute| {
            attribute.short_label().eq_ignore_ascii_case(arg)
                || format!("{attribute:?}").eq_ignore_ascii_case(arg)
        })
        .ok_or_else(|| bad(verb, arg))
}

/// `30`, `30s`, `2m` and `250ms` are all accepted; a bare number is seconds.
fn wait(verb: &str, arg: &str) -> Result<Duration, ParseError> {
    let (digits, unit) = match arg.find(|c: char| !c.is_ascii_digit()) {
        Some(split) => arg.split_at(split),
        None => (arg, "s"),
    };
    let amount: u64 = digits.parse().map_err(|_| bad(verb, arg))?;
    match unit {
        "ms" => Ok(Duration::from_millis(amount)),
        "s" => Ok(Duration::from_secs(amount)),
        "m" => Ok(Duration::from_secs(amount.saturating_mul(60))),
        _ => Err(bad(verb, arg)),
    }
}

/// Inverse of [`parse_line`] for commands, used when echoing a journal.
pub fn format_command(command: &Command) -> String {
    match command {
        Command::Move(Direction::North) => "n".to_string(),
        Command::Move(Direction::South) => "s".to_string(),
        Command::Move(Direction::East) => "e".to_string(),
        Command::Move(Direction::West) => "w".to_string(),
        Command::OpenShop => "shop".to_string(),
        Command::CloseShop => "close".to_string(),
        Command::Purchase(index) => format!("buy {index}"),
        Command::Combat(CombatAction::Attack) => "attack".to_string(),
        Command::Combat(CombatAction::Heal) => "heal".to_string(),
        Command::Combat(CombatAction::Flee) => "flee".to_string(),
        Command::ChooseAttribute(attribute) => {
            format!("level {}", attribute.short_label().to_ascii_lowercase())
        }
        Command::SelectClass(key) => format!("class {key}"),
        Command::ConfirmStart => "start".to_string(),
        Command::ReturnToMenu => "menu".to_string(),
        Command::Quit => "quit".to_string(),
    }
}
