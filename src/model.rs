use serde::{Deserialize, Serialize};

use crate::faction::Faction;

/// Observed upper bound on game rows per pairing.
pub const MAX_GAMES: usize = 5;

/// One fetched round page, handed from the fetcher to the extractor.
#[derive(Debug, Clone)]
pub struct Page {
    pub round: u32,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    #[serde(alias = "Round")]
    pub round: u32,
    #[serde(alias = "Zone")]
    pub zone: String,
    #[serde(alias = "Teams")]
    pub teams: [String; 2],
    #[serde(alias = "Games", default)]
    pub games: Vec<Game>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    #[serde(alias = "Players")]
    pub players: [String; 2],
    #[serde(alias = "Lists")]
    pub lists: [String; 2],
    #[serde(alias = "Winner")]
    pub winner: u8,
}

impl Game {
    /// Legacy crawler output padded every match to five games.
    pub fn is_padding(&self) -> bool {
        self.players.iter().all(|p| p.is_empty())
    }

    pub fn won(&self, side: usize) -> bool {
        usize::from(self.winner) == side
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub team_id: Option<i64>,
    pub faction: Option<Faction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub id: i64,
    pub caster: String,
    pub player_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub id: i64,
    pub round: u32,
    pub zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRow {
    pub id: i64,
    pub match_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: i64,
    pub game_id: i64,
    pub list_id: i64,
    pub won: bool,
}

/// A finished, normalized entity in derivation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Team(Team),
    Player(Player),
    List(List),
    Match(MatchRow),
    Game(GameRow),
    Report(Report),
}

impl Record {
    pub fn kind(&self) -> &'static str {
        match self {
            Record::Team(_) => "team",
            Record::Player(_) => "player",
            Record::List(_) => "list",
            Record::Match(_) => "match",
            Record::Game(_) => "game",
            Record::Report(_) => "report",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Record::Team(t) => t.id,
            Record::Player(p) => p.id,
            Record::List(l) => l.id,
            Record::Match(m) => m.id,
            Record::Game(g) => g.id,
            Record::Report(r) => r.id,
        }
    }
}
