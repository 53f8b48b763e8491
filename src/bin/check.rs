use anyhow::{Context, Result};

use wtc_scrape::args::{self, has_flag, path_flag};
use wtc_scrape::config::Config;
use wtc_scrape::logging;
use wtc_scrape::persist::{find_unknown_casters, open_db};

fn main() -> Result<()> {
    let args = args::args();
    logging::init("checker", has_flag(&args, "silent"));

    let db_path = path_flag(&args, "db").unwrap_or_else(|| Config::from_env().db_path);
    let conn = open_db(&db_path)
        .with_context(|| format!("opening database {}", db_path.display()))?;
    let typos = find_unknown_casters(&conn)?;

    if typos.is_empty() {
        println!("No unknown casters in {}", db_path.display());
        return Ok(());
    }
    println!("Unknown casters: {}", typos.len());
    for typo in &typos {
        println!(
            " - {} (round {}, zone {}): {}",
            typo.player, typo.round, typo.zone, typo.caster
        );
    }
    Ok(())
}
