//! Positional decoding of pairing rows into `Match` records.
//!
//! The source site exposes no stable ids or semantic classes inside a pairing
//! row, so every field is addressed by a fixed child path from the row root.
//! The paths below are the whole of that contract.

use std::sync::mpsc::{Receiver, SyncSender};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::dom::{self, DomNode};
use crate::model::{Game, MAX_GAMES, Match, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Child at a fixed offset, counting text and comment nodes.
    Child(usize),
    LastChild,
}

use Step::{Child, LastChild};

#[derive(Debug, Clone, Copy)]
pub struct FieldPath {
    pub field: &'static str,
    pub steps: &'static [Step],
}

pub const ZONE: FieldPath = FieldPath {
    field: "zone",
    steps: &[Child(0), LastChild, Child(0)],
};

pub const TEAMS: [FieldPath; 2] = [
    FieldPath {
        field: "team 1",
        steps: &[Child(1), Child(0), LastChild, Child(0)],
    },
    FieldPath {
        field: "team 2",
        steps: &[Child(3), Child(0), LastChild, Child(0)],
    },
];

/// Container whose children are the game rows.
pub const GAME_ROWS: FieldPath = FieldPath {
    field: "game rows",
    steps: &[LastChild],
};

// Relative to one game row.
pub const PLAYERS: [FieldPath; 2] = [
    FieldPath {
        field: "player 1",
        steps: &[Child(0), Child(0)],
    },
    FieldPath {
        field: "player 2",
        steps: &[LastChild, Child(0)],
    },
];

pub const LISTS: [FieldPath; 2] = [
    FieldPath {
        field: "list 1",
        steps: &[Child(0), LastChild, Child(0)],
    },
    FieldPath {
        field: "list 2",
        steps: &[LastChild, LastChild, Child(0)],
    },
];

/// Side 0 cell; its class carries the win marker.
pub const WINNER_CELL: FieldPath = FieldPath {
    field: "winner cell",
    steps: &[Child(0)],
};

const WINNER_MARKER: &str = "winner";
const TEAM_PREFIX: &str = "Team";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("{field}: no node at step {step}")]
    MissingNode { field: &'static str, step: usize },
    #[error("{field}: expected a text node")]
    NotText { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page body is empty")]
    Empty,
    #[error("page body is not utf-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("page structure: {0}")]
    TooDeep(#[from] dom::TooDeep),
}

pub fn resolve<'a>(node: &'a DomNode, path: &FieldPath) -> Result<&'a DomNode, ExtractError> {
    let mut current = node;
    for (idx, step) in path.steps.iter().enumerate() {
        let children = current.children();
        let next = match step {
            Child(offset) => children.get(*offset),
            LastChild => children.last(),
        };
        current = next.ok_or(ExtractError::MissingNode {
            field: path.field,
            step: idx,
        })?;
    }
    Ok(current)
}

pub fn text_at(node: &DomNode, path: &FieldPath) -> Result<String, ExtractError> {
    resolve(node, path)?
        .as_text()
        .map(|text| text.trim().to_string())
        .ok_or(ExtractError::NotText { field: path.field })
}

/// Drops a leading "Team" word from a raw team label.
pub fn clean_team_label(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_prefix(TEAM_PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
            rest.trim().to_string()
        }
        _ => trimmed.to_string(),
    }
}

pub fn decode_pairing(round: u32, pairing: &DomNode) -> Result<Match, ExtractError> {
    let zone = text_at(pairing, &ZONE)?;
    let teams = [
        clean_team_label(&text_at(pairing, &TEAMS[0])?),
        clean_team_label(&text_at(pairing, &TEAMS[1])?),
    ];

    let rows = resolve(pairing, &GAME_ROWS)?.children();
    if rows.len() > MAX_GAMES {
        warn!(round, zone = %zone, rows = rows.len(), "ignoring game rows past {MAX_GAMES}");
    }
    let games = rows
        .iter()
        .take(MAX_GAMES)
        .map(decode_game)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Match {
        round,
        zone,
        teams,
        games,
    })
}

pub fn decode_game(row: &DomNode) -> Result<Game, ExtractError> {
    let players = [text_at(row, &PLAYERS[0])?, text_at(row, &PLAYERS[1])?];
    let lists = [text_at(row, &LISTS[0])?, text_at(row, &LISTS[1])?];
    let side_zero_won = resolve(row, &WINNER_CELL)?
        .class()
        .is_some_and(|class| class.contains(WINNER_MARKER));
    Ok(Game {
        players,
        lists,
        winner: if side_zero_won { 0 } else { 1 },
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtract {
    pub matches: Vec<Match>,
    pub skipped: usize,
}

/// Decodes every pairing of a page. A malformed pairing is logged and skipped
/// without affecting its siblings.
pub fn extract_page(page: &Page) -> Result<PageExtract, PageError> {
    if page.body.is_empty() {
        return Err(PageError::Empty);
    }
    let html = std::str::from_utf8(&page.body)?;
    let root = dom::parse_document(html)?;

    let mut out = PageExtract::default();
    for (idx, pairing) in dom::find_pairings(&root).into_iter().enumerate() {
        match decode_pairing(page.round, pairing) {
            Ok(m) => {
                info!(round = m.round, zone = %m.zone, games = m.games.len(), "extracting match");
                out.matches.push(m);
            }
            Err(err) => {
                out.skipped += 1;
                error!(round = page.round, pairing = idx, error = %err, "skipping malformed pairing");
            }
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub pages_parsed: u32,
    pub pages_failed: u32,
    pub matches_extracted: usize,
    pub records_skipped: usize,
}

/// Extractor stage: drains `pages` until the fetcher hangs up.
pub fn run_extractor(pages: Receiver<Page>, tx: SyncSender<Match>) -> ExtractStats {
    let mut stats = ExtractStats::default();
    for page in pages {
        info!(round = page.round, bytes = page.body.len(), "parsing page");
        let extract = match extract_page(&page) {
            Ok(extract) => extract,
            Err(err) => {
                stats.pages_failed += 1;
                error!(round = page.round, error = %err, "parsing page");
                continue;
            }
        };
        stats.pages_parsed += 1;
        stats.records_skipped += extract.skipped;
        for m in extract.matches {
            stats.matches_extracted += 1;
            if tx.send(m).is_err() {
                error!(round = page.round, "normalizer hung up, stopping extraction");
                return stats;
            }
        }
    }
    stats
}
