use clap::Parser;

mod commands;

use commands::Commands;

#[derive(Parser)]
#[command(name = "nxcache")]
#[command(about = "Start and stop the nx-cache-server and inspect Nx cache usage", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    if let Err(e) = nxcache_utils::tracing::init() {
        eprintln!("nxcache: failed to initialize logging: {e}");
    }

    let cli = Cli::parse();
    cli.command.execute()?;
    Ok(())
}
