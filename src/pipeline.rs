//! Stage wiring. Each stage is one thread joined to the next by a bounded
//! `sync_channel`: a producer blocks while the queue is full, a consumer while
//! it is empty, and a stage ends when its upstream sender is dropped.

use std::fmt;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, ScopedJoinHandle};

use anyhow::Result;
use tracing::{error, info};

use crate::extract::{ExtractStats, run_extractor};
use crate::fetch::{FetchStats, PageSource, run_fetcher};
use crate::model::{Match, Record};
use crate::normalize::{NormalizeStats, Normalizer, run_normalizer};
use crate::persist::Sink;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub records_written: usize,
    pub write_failures: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub fetch: FetchStats,
    pub extract: ExtractStats,
    pub normalize: NormalizeStats,
    pub sink: SinkStats,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Rounds: {}/{} fetched",
            self.fetch.pages_fetched, self.fetch.rounds_attempted
        )?;
        writeln!(
            f,
            "Pages parsed: {} (failed {})",
            self.extract.pages_parsed, self.extract.pages_failed
        )?;
        writeln!(
            f,
            "Matches: {} extracted, {} skipped, {} normalized",
            self.extract.matches_extracted,
            self.extract.records_skipped,
            self.normalize.matches_normalized
        )?;
        writeln!(f, "Unparsed team names: {}", self.normalize.teams_unparsed)?;
        write!(
            f,
            "Records written: {} (failed {})",
            self.sink.records_written, self.sink.write_failures
        )
    }
}

/// Full run: fetch → extract → normalize → `sink`.
pub fn run<S, K>(source: &S, rounds: u32, capacity: usize, sink: &mut K) -> RunSummary
where
    S: PageSource + Sync + ?Sized,
    K: Sink + ?Sized,
{
    thread::scope(|scope| {
        let (page_tx, page_rx) = mpsc::sync_channel(capacity);
        let (match_tx, match_rx) = mpsc::sync_channel(capacity);
        let (record_tx, record_rx) = mpsc::sync_channel(capacity);

        let fetcher = scope.spawn(move || run_fetcher(source, rounds, page_tx));
        let extractor = scope.spawn(move || run_extractor(page_rx, match_tx));
        let normalizer =
            scope.spawn(move || run_normalizer(Normalizer::new(), match_rx, record_tx));

        let sink = drain_records(record_rx, sink);
        RunSummary {
            fetch: join_stage("fetch", fetcher),
            extract: join_stage("extract", extractor),
            normalize: join_stage("normalize", normalizer),
            sink,
        }
    })
}

/// Fetch and extract only, handing each match to `on_match` in arrival order.
pub fn crawl<S, F>(source: &S, rounds: u32, capacity: usize, mut on_match: F) -> RunSummary
where
    S: PageSource + Sync + ?Sized,
    F: FnMut(&Match) -> Result<()>,
{
    thread::scope(|scope| {
        let (page_tx, page_rx) = mpsc::sync_channel(capacity);
        let (match_tx, match_rx) = mpsc::sync_channel(capacity);

        let fetcher = scope.spawn(move || run_fetcher(source, rounds, page_tx));
        let extractor = scope.spawn(move || run_extractor(page_rx, match_tx));

        let mut sink = SinkStats::default();
        for m in match_rx {
            info!(round = m.round, zone = %m.zone, "writing match");
            match on_match(&m) {
                Ok(()) => sink.records_written += 1,
                Err(err) => {
                    sink.write_failures += 1;
                    error!(round = m.round, zone = %m.zone, error = %format!("{err:#}"), "writing match");
                }
            }
        }

        RunSummary {
            fetch: join_stage("fetch", fetcher),
            extract: join_stage("extract", extractor),
            sink,
            ..RunSummary::default()
        }
    })
}

/// Normalize an already-extracted match stream into `sink`.
pub fn crunch<I, K>(matches: I, capacity: usize, sink: &mut K) -> RunSummary
where
    I: IntoIterator<Item = Match>,
    K: Sink + Send + ?Sized,
{
    thread::scope(|scope| {
        let (match_tx, match_rx) = mpsc::sync_channel(capacity);
        let (record_tx, record_rx) = mpsc::sync_channel(capacity);

        let normalizer =
            scope.spawn(move || run_normalizer(Normalizer::new(), match_rx, record_tx));
        let writer = scope.spawn(move || drain_records(record_rx, sink));

        let mut extracted = 0usize;
        for m in matches {
            extracted += 1;
            if match_tx.send(m).is_err() {
                error!("normalizer hung up, stopping input");
                break;
            }
        }
        drop(match_tx);

        RunSummary {
            extract: ExtractStats {
                matches_extracted: extracted,
                ..ExtractStats::default()
            },
            normalize: join_stage("normalize", normalizer),
            sink: join_stage("sink", writer),
            ..RunSummary::default()
        }
    })
}

fn drain_records<K: Sink + ?Sized>(records: Receiver<Record>, sink: &mut K) -> SinkStats {
    let mut stats = SinkStats::default();
    for record in records {
        match sink.write(&record) {
            Ok(()) => stats.records_written += 1,
            Err(err) => {
                stats.write_failures += 1;
                error!(kind = record.kind(), id = record.id(), error = %format!("{err:#}"), "persisting record");
            }
        }
    }
    stats
}

fn join_stage<T: Default>(stage: &'static str, handle: ScopedJoinHandle<'_, T>) -> T {
    handle.join().unwrap_or_else(|_| {
        error!(stage, "stage panicked");
        T::default()
    })
}
