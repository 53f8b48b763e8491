use std::sync::mpsc::SyncSender;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use tracing::{error, info};

use crate::config::Config;
use crate::http_client::http_client;
use crate::model::Page;

/// Where round pages come from. The live site in production, canned HTML in
/// tests.
pub trait PageSource {
    fn fetch(&self, round: u32) -> Result<Vec<u8>>;
}

pub struct HttpSource {
    client: &'static Client,
    config: Config,
}

impl HttpSource {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http_client(config.http_timeout)?,
            config: config.clone(),
        })
    }
}

impl PageSource for HttpSource {
    fn fetch(&self, round: u32) -> Result<Vec<u8>> {
        let url = self.config.round_url(round);
        info!(round, url = %url, "retrieving page");
        let resp = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("request {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("http {status} for {url}"));
        }
        let body = resp.bytes().context("failed reading body")?;
        Ok(body.to_vec())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub rounds_attempted: u32,
    pub pages_fetched: u32,
    pub pages_failed: u32,
}

/// Attempts rounds `1..=rounds` once each, in order. Failed rounds are logged
/// and omitted; dropping `tx` on return signals end of stream.
pub fn run_fetcher<S: PageSource + ?Sized>(
    source: &S,
    rounds: u32,
    tx: SyncSender<Page>,
) -> FetchStats {
    let mut stats = FetchStats::default();
    for round in 1..=rounds {
        stats.rounds_attempted += 1;
        match source.fetch(round) {
            Ok(body) => {
                stats.pages_fetched += 1;
                if tx.send(Page { round, body }).is_err() {
                    error!(round, "extractor hung up, stopping fetch");
                    break;
                }
            }
            Err(err) => {
                stats.pages_failed += 1;
                error!(round, error = %format!("{err:#}"), "retrieving page");
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    struct OddRoundsFail;

    impl PageSource for OddRoundsFail {
        fn fetch(&self, round: u32) -> Result<Vec<u8>> {
            if round % 2 == 1 {
                Err(anyhow!("boom"))
            } else {
                Ok(format!("<p>{round}</p>").into_bytes())
            }
        }
    }

    #[test]
    fn failed_rounds_are_skipped_not_fatal() {
        let (tx, rx) = mpsc::sync_channel(16);
        let stats = run_fetcher(&OddRoundsFail, 6, tx);
        let rounds = rx.iter().map(|page| page.round).collect::<Vec<_>>();
        assert_eq!(rounds, vec![2, 4, 6]);
        assert_eq!(stats.rounds_attempted, 6);
        assert_eq!(stats.pages_fetched, 3);
        assert_eq!(stats.pages_failed, 3);
    }
}
