use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use wtc_scrape::args::{self, flag_value, has_flag};
use wtc_scrape::config::Config;
use wtc_scrape::fetch::HttpSource;
use wtc_scrape::interchange::write_match;
use wtc_scrape::logging;
use wtc_scrape::pipeline;

fn main() -> Result<()> {
    let args = args::args();
    logging::init("crawler", has_flag(&args, "silent"));

    let mut config = Config::from_env();
    if let Some(rounds) = flag_value(&args, "rounds").and_then(|raw| raw.parse::<u32>().ok()) {
        config.rounds = rounds.clamp(1, 64);
    }

    let out_path = flag_value(&args, "out").unwrap_or_else(|| "-".to_string());
    let out: Box<dyn Write> = if out_path == "-" {
        Box::new(io::stdout().lock())
    } else {
        let file =
            File::create(&out_path).with_context(|| format!("creating output file {out_path}"))?;
        Box::new(file)
    };
    let mut out = BufWriter::new(out);

    let source = HttpSource::new(&config)?;
    let summary = pipeline::crawl(&source, config.rounds, config.queue_capacity, |m| {
        write_match(&mut out, m)
    });
    out.flush().context("flush output")?;

    eprintln!("{summary}");
    Ok(())
}
