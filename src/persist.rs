use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use rusqlite::{Connection, params, params_from_iter};

use crate::faction::known_casters;
use crate::model::Record;

/// Durable destination for normalized records.
pub trait Sink {
    fn write(&mut self, record: &Record) -> Result<()>;
}

impl Sink for Vec<Record> {
    fn write(&mut self, record: &Record) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS team (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            country TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS player (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            faction TEXT NULL,
            team_id INTEGER NULL
        );
        CREATE TABLE IF NOT EXISTS list (
            id INTEGER PRIMARY KEY,
            caster TEXT NOT NULL,
            player_id INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS "match" (
            id INTEGER PRIMARY KEY,
            round INTEGER NOT NULL,
            zone TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS game (
            id INTEGER PRIMARY KEY,
            match_id INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS report (
            id INTEGER PRIMARY KEY,
            game_id INTEGER NOT NULL,
            list_id INTEGER NOT NULL,
            won INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_report_list ON report(list_id);
        CREATE INDEX IF NOT EXISTS idx_report_game ON report(game_id);

        CREATE TABLE IF NOT EXISTS ingest_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NULL,
            records_written INTEGER NOT NULL,
            errors_json TEXT NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

const RELATIONS: [&str; 6] = ["team", "player", "list", "match", "game", "report"];

/// Inserts records with their normalizer-assigned ids. Identity is never
/// derived from rowids, so a failed insert leaves later ids unaffected.
pub struct SqliteSink {
    conn: Connection,
    run_id: i64,
    written: usize,
    errors: Vec<String>,
}

impl SqliteSink {
    pub fn open(path: &Path) -> Result<Self> {
        Self::new(open_db(path)?)
    }

    /// Fails when any relation already holds rows: ids restart at 1 each run
    /// and would collide with the previous run's rows.
    pub fn new(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        for table in RELATIONS {
            let rows: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
                    row.get(0)
                })
                .with_context(|| format!("count rows in {table}"))?;
            if rows > 0 {
                bail!("table {table} already holds {rows} rows; write to a fresh database");
            }
        }
        let started_at = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO ingest_runs(started_at, finished_at, records_written, errors_json)
             VALUES (?1, NULL, 0, '[]')",
            params![started_at],
        )
        .context("insert ingest run")?;
        let run_id = conn.last_insert_rowid();
        Ok(Self {
            conn,
            run_id,
            written: 0,
            errors: Vec::new(),
        })
    }

    /// Stamps the run row and hands back the connection.
    pub fn finish(self) -> Result<Connection> {
        let finished_at = Utc::now().to_rfc3339();
        let errors_json = serde_json::to_string(&self.errors).unwrap_or_else(|_| "[]".to_string());
        self.conn
            .execute(
                "UPDATE ingest_runs
                 SET finished_at = ?1, records_written = ?2, errors_json = ?3
                 WHERE run_id = ?4",
                params![finished_at, self.written as i64, errors_json, self.run_id],
            )
            .context("update ingest run")?;
        Ok(self.conn)
    }

    fn insert(&self, record: &Record) -> rusqlite::Result<usize> {
        match record {
            Record::Team(t) => self.conn.execute(
                "INSERT INTO team (id, name, country) VALUES (?1, ?2, ?3)",
                params![t.id, t.name, t.country],
            ),
            Record::Player(p) => self.conn.execute(
                "INSERT INTO player (id, name, faction, team_id) VALUES (?1, ?2, ?3, ?4)",
                params![p.id, p.name, p.faction.map(|f| f.as_str()), p.team_id],
            ),
            Record::List(l) => self.conn.execute(
                "INSERT INTO list (id, caster, player_id) VALUES (?1, ?2, ?3)",
                params![l.id, l.caster, l.player_id],
            ),
            Record::Match(m) => self.conn.execute(
                "INSERT INTO \"match\" (id, round, zone) VALUES (?1, ?2, ?3)",
                params![m.id, m.round, m.zone],
            ),
            Record::Game(g) => self.conn.execute(
                "INSERT INTO game (id, match_id) VALUES (?1, ?2)",
                params![g.id, g.match_id],
            ),
            Record::Report(r) => self.conn.execute(
                "INSERT INTO report (id, game_id, list_id, won) VALUES (?1, ?2, ?3, ?4)",
                params![r.id, r.game_id, r.list_id, r.won],
            ),
        }
    }
}

impl Sink for SqliteSink {
    fn write(&mut self, record: &Record) -> Result<()> {
        if let Err(err) = self.insert(record) {
            let msg = format!("inserting {} {}: {err}", record.kind(), record.id());
            self.errors.push(msg.clone());
            return Err(anyhow::anyhow!(msg));
        }
        self.written += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasterTypo {
    pub player: String,
    pub round: u32,
    pub zone: String,
    pub caster: String,
}

/// Lists played with a caster missing from the faction table.
pub fn find_unknown_casters(conn: &Connection) -> Result<Vec<CasterTypo>> {
    let known = known_casters().collect::<Vec<_>>();
    let placeholders = vec!["?"; known.len()].join(", ");
    let sql = format!(
        r#"
        SELECT DISTINCT player.name, m.round, m.zone, list.caster
        FROM list
        JOIN player ON player.id = list.player_id
        JOIN report ON report.list_id = list.id
        JOIN game ON game.id = report.game_id
        JOIN "match" AS m ON m.id = game.match_id
        WHERE list.caster NOT IN ({placeholders})
        ORDER BY list.caster, player.name
        "#
    );
    let mut stmt = conn.prepare(&sql).context("prepare unknown caster query")?;
    let rows = stmt
        .query_map(params_from_iter(known.iter()), |row| {
            Ok(CasterTypo {
                player: row.get(0)?,
                round: row.get(1)?,
                zone: row.get(2)?,
                caster: row.get(3)?,
            })
        })
        .context("query unknown casters")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode caster row")?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GameRow, List, MatchRow, Player, Report, Team};

    fn sample() -> Vec<Record> {
        vec![
            Record::Team(Team {
                id: 1,
                name: "Eagles".to_string(),
                country: "USA".to_string(),
            }),
            Record::Player(Player {
                id: 1,
                name: "Alice".to_string(),
                team_id: Some(1),
                faction: None,
            }),
            Record::List(List {
                id: 1,
                caster: "Cainee 2".to_string(),
                player_id: 1,
            }),
            Record::Match(MatchRow {
                id: 1,
                round: 4,
                zone: "Zone A".to_string(),
            }),
            Record::Game(GameRow { id: 1, match_id: 1 }),
            Record::Report(Report {
                id: 1,
                game_id: 1,
                list_id: 1,
                won: true,
            }),
        ]
    }

    #[test]
    fn sqlite_sink_writes_rows_and_flags_typos() {
        let conn = Connection::open_in_memory().expect("memory db");
        let mut sink = SqliteSink::new(conn).expect("sink");
        for record in sample() {
            sink.write(&record).expect("insert");
        }
        let conn = sink.finish().expect("finish");

        let reports: i64 = conn
            .query_row("SELECT COUNT(*) FROM report WHERE won = 1", [], |row| row.get(0))
            .expect("count");
        assert_eq!(reports, 1);

        let typos = find_unknown_casters(&conn).expect("typos");
        assert_eq!(typos.len(), 1);
        assert_eq!(typos[0].caster, "Cainee 2");
        assert_eq!(typos[0].round, 4);
    }

    #[test]
    fn duplicate_id_is_a_write_error() {
        let conn = Connection::open_in_memory().expect("memory db");
        let mut sink = SqliteSink::new(conn).expect("sink");
        let team = sample().remove(0);
        sink.write(&team).expect("first insert");
        assert!(sink.write(&team).is_err());
    }

    #[test]
    fn populated_database_is_refused() {
        let conn = Connection::open_in_memory().expect("memory db");
        let mut sink = SqliteSink::new(conn).expect("sink");
        for record in sample() {
            sink.write(&record).expect("insert");
        }
        let conn = sink.finish().expect("finish");

        let err = SqliteSink::new(conn).err().expect("second run should be refused");
        assert!(err.to_string().contains("team"));
    }
}
