use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use ctm_tools::{describe, init_logging, load_ctm};

#[derive(Parser)]
#[command(name = "ctminfo", version, about = "Print the contents of OpenCTM files")]
struct Cli {
    /// Files to inspect
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut failed = 0;
    for path in &cli.files {
        let report = load_ctm(path).and_then(|mut ctx| describe(&mut ctx));
        match report.with_context(|| format!("reading {}", path.display())) {
            Ok(report) => print!("{}:\n{}", path.display(), report),
            Err(err) => {
                log::error!("{:#}", err);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{} of {} files could not be read", failed, cli.files.len());
    }
    Ok(())
}
