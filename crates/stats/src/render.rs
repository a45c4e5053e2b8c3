//! Human-readable statistics report

use crate::statistics::{CacheStatistics, CacheTask};
use std::io::{self, Write};

const RULE: &str = "───────────────────────";

/// Write the report for `stats` to `out`
pub fn render(stats: &CacheStatistics, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "NX Cache Statistics")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Command           : {}", stats.command)?;
    writeln!(out, "Tasks executed    : {}", stats.total_tasks)?;
    writeln!(out)?;

    writeln!(out, "Cache Status Count")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Local cache hits  : {}", stats.local_cache_hits.len())?;
    writeln!(out, "Remote cache hits : {}", stats.remote_cache_hits.len())?;
    writeln!(out, "None              : {}", stats.no_cache.len())?;
    if let Some(rate) = stats.hit_rate() {
        writeln!(out, "Hit rate          : {rate:.1}%")?;
    }
    writeln!(out)?;

    render_id_list(out, "Local cache-hit taskIds:", &stats.local_cache_hits)?;
    render_id_list(out, "Remote cache-hit taskIds:", &stats.remote_cache_hits)?;
    render_id_list(out, "No cache taskIds:", &stats.no_cache)?;
    Ok(())
}

fn render_id_list(out: &mut impl Write, title: &str, tasks: &[CacheTask]) -> io::Result<()> {
    if tasks.is_empty() {
        return Ok(());
    }

    writeln!(out, "{title}")?;
    for task in tasks {
        writeln!(
            out,
            "  • {} ({})",
            task.task_id.as_deref().unwrap_or(""),
            task.hash.as_deref().unwrap_or("")
        )?;
    }
    writeln!(out)
}
