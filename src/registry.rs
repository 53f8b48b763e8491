use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Team,
    Player,
    List,
    Match,
    Game,
    Report,
}

impl EntityKind {
    const COUNT: usize = 6;

    fn index(self) -> usize {
        match self {
            EntityKind::Team => 0,
            EntityKind::Player => 1,
            EntityKind::List => 2,
            EntityKind::Match => 3,
            EntityKind::Game => 4,
            EntityKind::Report => 5,
        }
    }
}

/// Outcome of an identity lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Existing(i64),
    New(i64),
}

impl Identity {
    pub fn id(self) -> i64 {
        match self {
            Identity::Existing(id) | Identity::New(id) => id,
        }
    }

    pub fn is_new(self) -> bool {
        matches!(self, Identity::New(_))
    }
}

/// Name → id maps plus per-kind counters for one pipeline run.
///
/// First writer wins: once a key is bound its id never changes, and ids of
/// each kind run 1, 2, 3, ... without gaps.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    teams: HashMap<String, i64>,
    players: HashMap<String, i64>,
    lists: HashMap<(String, String), i64>,
    counters: [i64; EntityKind::COUNT],
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, kind: EntityKind) -> i64 {
        let counter = &mut self.counters[kind.index()];
        *counter += 1;
        *counter
    }

    /// Number of ids handed out so far for `kind`.
    pub fn issued(&self, kind: EntityKind) -> i64 {
        self.counters[kind.index()]
    }

    pub fn team(&self, raw_name: &str) -> Option<i64> {
        self.teams.get(raw_name).copied()
    }

    pub fn player(&self, name: &str) -> Option<i64> {
        self.players.get(name).copied()
    }

    pub fn list(&self, player: &str, caster: &str) -> Option<i64> {
        self.lists
            .get(&(player.to_string(), caster.to_string()))
            .copied()
    }

    pub fn bind_team(&mut self, raw_name: &str) -> Identity {
        let id = self.team(raw_name);
        self.bind(id, EntityKind::Team, |reg, id| {
            reg.teams.insert(raw_name.to_string(), id);
        })
    }

    pub fn bind_player(&mut self, name: &str) -> Identity {
        let id = self.player(name);
        self.bind(id, EntityKind::Player, |reg, id| {
            reg.players.insert(name.to_string(), id);
        })
    }

    pub fn bind_list(&mut self, player: &str, caster: &str) -> Identity {
        let id = self.list(player, caster);
        self.bind(id, EntityKind::List, |reg, id| {
            reg.lists.insert((player.to_string(), caster.to_string()), id);
        })
    }

    fn bind(
        &mut self,
        existing: Option<i64>,
        kind: EntityKind,
        insert: impl FnOnce(&mut Self, i64),
    ) -> Identity {
        if let Some(id) = existing {
            return Identity::Existing(id);
        }
        let id = self.next_id(kind);
        insert(self, id);
        Identity::New(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_per_kind() {
        let mut reg = IdentityRegistry::new();
        assert_eq!(reg.bind_team("USA Eagles"), Identity::New(1));
        assert_eq!(reg.bind_player("Alice"), Identity::New(1));
        assert_eq!(reg.bind_team("France Wolves"), Identity::New(2));
        assert_eq!(reg.bind_team("USA Eagles"), Identity::Existing(1));
        assert_eq!(reg.next_id(EntityKind::Game), 1);
        assert_eq!(reg.issued(EntityKind::Team), 2);
    }

    #[test]
    fn lists_are_keyed_by_player_and_caster() {
        let mut reg = IdentityRegistry::new();
        let a = reg.bind_list("Alice", "Caine 2").id();
        let b = reg.bind_list("Bob", "Caine 2").id();
        let c = reg.bind_list("Alice", "Haley 2").id();
        assert_eq!((a, b, c), (1, 2, 3));
        assert_eq!(reg.bind_list("Alice", "Caine 2"), Identity::Existing(1));
    }
}
