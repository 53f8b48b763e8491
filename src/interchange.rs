//! Newline-delimited JSON carrying one `Match` per line between the crawl and
//! crunch stages.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow};
use tracing::error;

use crate::model::{MAX_GAMES, Match};

pub fn write_match<W: Write>(out: &mut W, m: &Match) -> Result<()> {
    serde_json::to_writer(&mut *out, m).context("encode match")?;
    out.write_all(b"\n").context("write match line")?;
    Ok(())
}

/// Decodes one line, dropping legacy padding games.
pub fn decode_line(line: &str) -> Result<Match> {
    let mut m: Match = serde_json::from_str(line).context("decode match")?;
    m.games.retain(|g| !g.is_padding());
    if m.games.len() > MAX_GAMES {
        return Err(anyhow!("{} games, expected at most {MAX_GAMES}", m.games.len()));
    }
    if let Some(game) = m.games.iter().find(|g| g.winner > 1) {
        return Err(anyhow!("winner {} is not a side index", game.winner));
    }
    Ok(m)
}

/// Iterates the matches of a stream. Undecodable lines are logged and
/// skipped; blank lines are ignored.
pub fn read_matches<R: BufRead>(input: R) -> impl Iterator<Item = Match> {
    input
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    error!(line = idx + 1, error = %err, "reading match");
                    return None;
                }
            };
            if line.trim().is_empty() {
                return None;
            }
            match decode_line(&line) {
                Ok(m) => Some(m),
                Err(err) => {
                    error!(line = idx + 1, error = %format!("{err:#}"), "reading match");
                    None
                }
            }
        })
}
