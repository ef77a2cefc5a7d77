//! Line commands understood by the console binaries

use anyhow::{anyhow, bail, Context, Result};
use std::str::FromStr;

/// Commands read by `tx_feed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedCommand {
    Start,
    Stop,
    Reset,
    Status,
    Help,
    Quit,
}

impl FromStr for FeedCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "reset" => Ok(Self::Reset),
            "status" | "" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(anyhow!("unknown command {:?} (try `help`)", other)),
        }
    }
}

impl FeedCommand {
    pub const HELP: &'static str = "commands: start | stop | reset | status | help | quit";
}

/// Commands read by `workspace`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutCommand {
    List,
    Front(u32),
    Move { id: u32, x: f64, y: f64 },
    Resize { id: u32, width: f64, height: f64 },
    Remove(u32),
    Reset,
    Help,
    Quit,
}

impl LayoutCommand {
    pub const HELP: &'static str = concat!(
        "commands: list | front <id> | move <id> <x> <y> | resize <id> <w> <h> | ",
        "remove <id> | reset | help | quit"
    );
}

impl FromStr for LayoutCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((name, args)) = words.split_first() else {
            return Ok(Self::List);
        };

        let command = match (name.to_ascii_lowercase().as_str(), args) {
            ("list" | "ls", []) => Self::List,
            ("front", [id]) => Self::Front(number(id, "id")?),
            ("move", [id, x, y]) => Self::Move {
                id: number(id, "id")?,
                x: coordinate(x, "x")?,
                y: coordinate(y, "y")?,
            },
            ("resize", [id, w, h]) => Self::Resize {
                id: number(id, "id")?,
                width: coordinate(w, "width")?,
                height: coordinate(h, "height")?,
            },
            ("remove" | "rm", [id]) => Self::Remove(number(id, "id")?),
            ("reset", []) => Self::Reset,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit" | "q", []) => Self::Quit,
            (name, _) => bail!(
                "cannot parse {:?} with {} argument(s) (try `help`)",
                name,
                args.len()
            ),
        };

        Ok(command)
    }
}

fn number<T>(word: &str, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    word.parse::<T>()
        .with_context(|| format!("invalid {} {:?}", what, word))
}

// Fractions are fine; NaN and infinities would not survive the JSON slot
fn coordinate(word: &str, what: &str) -> Result<f64> {
    let value: f64 = number(word, what)?;
    if !value.is_finite() {
        bail!("{} must be a finite number, got {:?}", what, word);
    }
    Ok(value)
}
