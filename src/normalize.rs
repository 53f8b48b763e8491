use std::sync::mpsc::{Receiver, SyncSender};

use tracing::{error, info, warn};

use crate::country::{self, COUNTRIES};
use crate::faction::{faction_of, fix_caster};
use crate::model::{GameRow, List, Match, MatchRow, Player, Record, Report, Team};
use crate::registry::{EntityKind, IdentityRegistry};

/// Single-writer state machine turning raw matches into normalized records.
///
/// Owns its registry; build one per pipeline run.
pub struct Normalizer {
    registry: IdentityRegistry,
    countries: &'static [&'static str],
    unparsed_teams: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::with_countries(COUNTRIES)
    }

    pub fn with_countries(countries: &'static [&'static str]) -> Self {
        Self {
            registry: IdentityRegistry::new(),
            countries,
            unparsed_teams: 0,
        }
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Times a team label matched no known country.
    pub fn unparsed_teams(&self) -> usize {
        self.unparsed_teams
    }

    /// Records derived from `m`, ordered so every referenced id appears
    /// before its first use.
    pub fn normalize(&mut self, m: &Match) -> Vec<Record> {
        let mut out = Vec::new();
        let games = m.games.iter().filter(|g| !g.is_padding()).collect::<Vec<_>>();

        for raw in &m.teams {
            if self.registry.team(raw).is_some() {
                continue;
            }
            let Some((country, name)) = country::split_team_label(raw, self.countries) else {
                self.unparsed_teams += 1;
                error!(team = %raw, round = m.round, zone = %m.zone, "unable to parse team name");
                continue;
            };
            let id = self.registry.bind_team(raw).id();
            info!(id, country, name, "inserting team");
            out.push(Record::Team(Team {
                id,
                name: name.to_string(),
                country: country.to_string(),
            }));
        }
        let team_ids = [self.registry.team(&m.teams[0]), self.registry.team(&m.teams[1])];

        for game in &games {
            for side in 0..2 {
                let name = &game.players[side];
                let identity = self.registry.bind_player(name);
                if !identity.is_new() {
                    continue;
                }
                let player = Player {
                    id: identity.id(),
                    name: name.clone(),
                    team_id: team_ids[side],
                    faction: faction_of(&game.lists[side]),
                };
                info!(id = player.id, name = %player.name, team_id = ?player.team_id, "inserting player");
                out.push(Record::Player(player));
            }
        }

        for game in &games {
            for side in 0..2 {
                let player = &game.players[side];
                let caster = fix_caster(&game.lists[side]);
                let Some(player_id) = self.registry.player(player) else {
                    warn!(player = %player, caster, "list without player identity");
                    continue;
                };
                let identity = self.registry.bind_list(player, caster);
                if !identity.is_new() {
                    continue;
                }
                info!(id = identity.id(), player = %player, caster, "inserting list");
                out.push(Record::List(List {
                    id: identity.id(),
                    caster: caster.to_string(),
                    player_id,
                }));
            }
        }

        let match_id = self.registry.next_id(EntityKind::Match);
        info!(id = match_id, round = m.round, zone = %m.zone, "inserting match");
        out.push(Record::Match(MatchRow {
            id: match_id,
            round: m.round,
            zone: m.zone.clone(),
        }));

        for game in &games {
            let game_id = self.registry.next_id(EntityKind::Game);
            out.push(Record::Game(GameRow {
                id: game_id,
                match_id,
            }));
            for side in 0..2 {
                let caster = fix_caster(&game.lists[side]);
                let Some(list_id) = self.registry.list(&game.players[side], caster) else {
                    continue;
                };
                out.push(Record::Report(Report {
                    id: self.registry.next_id(EntityKind::Report),
                    game_id,
                    list_id,
                    won: game.won(side),
                }));
            }
        }

        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub matches_normalized: usize,
    pub records_emitted: usize,
    pub teams_unparsed: usize,
}

/// Normalizer stage. Must be the only consumer feeding `normalizer`.
pub fn run_normalizer(
    mut normalizer: Normalizer,
    matches: Receiver<Match>,
    tx: SyncSender<Record>,
) -> NormalizeStats {
    let mut stats = NormalizeStats::default();
    'matches: for m in matches {
        stats.matches_normalized += 1;
        for record in normalizer.normalize(&m) {
            stats.records_emitted += 1;
            if tx.send(record).is_err() {
                error!(round = m.round, zone = %m.zone, "sink hung up, stopping normalizer");
                break 'matches;
            }
        }
    }
    stats.teams_unparsed = normalizer.unparsed_teams();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Game;

    fn game(p1: &str, p2: &str, l1: &str, l2: &str, winner: u8) -> Game {
        Game {
            players: [p1.to_string(), p2.to_string()],
            lists: [l1.to_string(), l2.to_string()],
            winner,
        }
    }

    #[test]
    fn caster_variant_shares_list_identity() {
        let mut normalizer = Normalizer::new();
        let m = Match {
            round: 1,
            zone: "Zone A".to_string(),
            teams: ["USA Eagles".to_string(), "France Wolves".to_string()],
            games: vec![
                game("Ivan", "Bob", "vHarkevich 1", "Caine 2", 0),
                game("Ivan", "Bob", "Harkevich 1", "Caine 2", 1),
            ],
        };
        let lists = normalizer
            .normalize(&m)
            .into_iter()
            .filter_map(|r| match r {
                Record::List(l) => Some(l),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].caster, "Harkevich 1");
    }

    #[test]
    fn padding_games_are_ignored() {
        let mut normalizer = Normalizer::new();
        let m = Match {
            round: 2,
            zone: "Zone B".to_string(),
            teams: ["USA Eagles".to_string(), "France Wolves".to_string()],
            games: vec![game("A", "B", "Caine 2", "Haley 2", 1), game("", "", "", "", 0)],
        };
        let records = normalizer.normalize(&m);
        let games = records.iter().filter(|r| r.kind() == "game").count();
        let players = records.iter().filter(|r| r.kind() == "player").count();
        assert_eq!(games, 1);
        assert_eq!(players, 2);
    }
}
