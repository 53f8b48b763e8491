use anyhow::{Context, Result};

use wtc_scrape::args::{self, flag_value, has_flag, path_flag};
use wtc_scrape::config::Config;
use wtc_scrape::fetch::HttpSource;
use wtc_scrape::logging;
use wtc_scrape::persist::SqliteSink;
use wtc_scrape::pipeline;

fn main() -> Result<()> {
    let args = args::args();
    logging::init("wtc_scrape", has_flag(&args, "silent"));

    let mut config = Config::from_env();
    if let Some(db) = path_flag(&args, "db") {
        config.db_path = db;
    }
    if let Some(rounds) = flag_value(&args, "rounds").and_then(|raw| raw.parse::<u32>().ok()) {
        config.rounds = rounds.clamp(1, 64);
    }

    let source = HttpSource::new(&config)?;
    let mut sink = SqliteSink::open(&config.db_path)
        .with_context(|| format!("opening database {}", config.db_path.display()))?;
    let summary = pipeline::run(&source, config.rounds, config.queue_capacity, &mut sink);
    sink.finish()?;

    println!("Scrape complete");
    println!("DB: {}", config.db_path.display());
    println!("{summary}");
    Ok(())
}
