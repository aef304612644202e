use std::io::{self, Write};
use std::process;

use anyhow::{Context, Result};

use gitsum::config::Config;
use gitsum::{cli, logger};

/// Exit status after Ctrl-C, following the shell convention of 128 + SIGINT.
const CANCELLED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::command().get_matches();
    let config = Config::from_matches(&matches);
    logger::init(config.verbose);

    let root = std::env::current_dir().context("Unable to determine the current directory")?;

    // git2 calls block, so the scan runs off the runtime while we wait for Ctrl-C.
    let scan = tokio::task::spawn_blocking(move || -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        gitsum::run(&root, &config, &mut out)?;
        out.flush()?;
        Ok(())
    });

    tokio::select! {
        res = scan => res.context("The scan stopped unexpectedly")?,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Cancelled.");
            process::exit(CANCELLED);
        }
    }
}
