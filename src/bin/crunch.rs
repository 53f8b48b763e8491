use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result};

use wtc_scrape::args::{self, flag_value, has_flag, path_flag};
use wtc_scrape::config::Config;
use wtc_scrape::interchange::read_matches;
use wtc_scrape::logging;
use wtc_scrape::persist::SqliteSink;
use wtc_scrape::pipeline;

fn main() -> Result<()> {
    let args = args::args();
    logging::init("cruncher", has_flag(&args, "silent"));

    let mut config = Config::from_env();
    if let Some(db) = path_flag(&args, "db") {
        config.db_path = db;
    }

    let in_path = flag_value(&args, "in").unwrap_or_else(|| "-".to_string());
    let input: Box<dyn BufRead> = if in_path == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&in_path).with_context(|| format!("opening input file {in_path}"))?;
        Box::new(BufReader::new(file))
    };

    let mut sink = SqliteSink::open(&config.db_path)
        .with_context(|| format!("opening database {}", config.db_path.display()))?;
    let summary = pipeline::crunch(read_matches(input), config.queue_capacity, &mut sink);
    sink.finish()?;

    println!("Crunch complete");
    println!("DB: {}", config.db_path.display());
    println!(
        "Matches: {} read, {} normalized",
        summary.extract.matches_extracted, summary.normalize.matches_normalized
    );
    println!("Unparsed team names: {}", summary.normalize.teams_unparsed);
    println!(
        "Records written: {} (failed {})",
        summary.sink.records_written, summary.sink.write_failures
    );
    Ok(())
}
