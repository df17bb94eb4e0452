use std::{fs::File, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use simple_bank::{
    registry::Registry,
    shell::{Session, logging::init_logger, seed::load_registry, statement::print_statement},
};

/// Interactive console for managing in-memory bank accounts
#[derive(Parser, Debug)]
#[command(name = "simple-bank", version, about, long_about = None)]
struct Args {
    /// Seed accounts from a CSV file with `id,owner,balance` columns
    #[arg(long, value_name = "FILE", conflicts_with = "no_samples")]
    accounts: Option<PathBuf>,
    /// Start without the sample accounts
    #[arg(long)]
    no_samples: bool,
    /// Print a CSV statement of all accounts when the session ends
    #[arg(long)]
    statement: bool,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let registry = if let Some(path) = &args.accounts {
        let file =
            File::open(path).with_context(|| format!("Failed to open `{}`", path.display()))?;
        load_registry(file).with_context(|| format!("Failed to load `{}`", path.display()))?
    } else if args.no_samples {
        Registry::new()
    } else {
        Registry::with_sample_accounts()?
    };
    tracing::debug!(accounts = registry.count(), "session starting");

    let mut stdout = io::stdout();
    let session = Session {
        input: io::stdin().lock(),
        output: &mut stdout,
        registry,
    };
    let registry = session.run()?;

    if args.statement {
        print_statement(&mut stdout, registry.iter())?;
    }
    Ok(())
}
