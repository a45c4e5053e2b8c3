use nxcache_core::{Error, Result};
use nxcache_stats::{render, statistics, JsonOutput, StatsOutcome};
use nxcache_utils::paths::default_run_json;
use std::io::{self, Write};
use std::path::PathBuf;

pub fn execute(run_json_path: Option<PathBuf>, json: Option<Option<PathBuf>>) -> Result<()> {
    let run_json_path = run_json_path.unwrap_or_else(default_run_json);
    let output = json.map(|file_name| JsonOutput { file_name });

    match statistics(&run_json_path, output.as_ref())? {
        StatsOutcome::Report(stats) => {
            let mut stdout = io::stdout().lock();
            render(&stats, &mut stdout)
                .and_then(|()| stdout.flush())
                .map_err(|e| Error::file_system("<stdout>", "write statistics", e))?;
        }
        StatsOutcome::Written(path) => {
            println!("\nStats written to {}", path.display());
        }
    }
    Ok(())
}
