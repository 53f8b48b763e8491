use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use tracing::{error, info};

use wtc_scrape::args::{self, flag_value, has_flag};
use wtc_scrape::faction::fix_caster;
use wtc_scrape::interchange::{read_matches, write_match};
use wtc_scrape::logging;

fn main() -> Result<()> {
    let args = args::args();
    logging::init("fixer", has_flag(&args, "silent"));

    let in_path = flag_value(&args, "in").unwrap_or_else(|| "-".to_string());
    let input: Box<dyn BufRead> = if in_path == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&in_path).with_context(|| format!("opening input file {in_path}"))?;
        Box::new(BufReader::new(file))
    };

    let out_path = flag_value(&args, "out").unwrap_or_else(|| "-".to_string());
    let out: Box<dyn Write> = if out_path == "-" {
        Box::new(io::stdout().lock())
    } else {
        let file =
            File::create(&out_path).with_context(|| format!("creating output file {out_path}"))?;
        Box::new(file)
    };
    let mut out = BufWriter::new(out);

    let mut fixed = 0usize;
    for mut m in read_matches(input) {
        for game in &mut m.games {
            for caster in &mut game.lists {
                let corrected = fix_caster(caster);
                if corrected != caster.as_str() {
                    *caster = corrected.to_string();
                    fixed += 1;
                }
            }
        }
        info!(round = m.round, zone = %m.zone, "writing match");
        if let Err(err) = write_match(&mut out, &m) {
            error!(round = m.round, zone = %m.zone, error = %format!("{err:#}"), "writing fixed match");
        }
    }
    out.flush().context("flush output")?;

    eprintln!("Casters corrected: {fixed}");
    Ok(())
}
