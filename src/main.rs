use anyhow::Context;
use clap::Parser;
use compute::Accounts;
use menu::Carrier;
use read::read_messages;
use std::path::PathBuf;

mod compute;
mod data;
mod menu;
mod read;
mod write;

/// Message utilization and account admin for a small wireless carrier
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Message file, one message per line
    #[arg(env = "CARRIER_INPUT", default_value = "messages.txt")]
    input: PathBuf,
    /// Location shown in the menu banner
    #[arg(short, long, env = "CARRIER_LOCATION", default_value = "Palo Alto")]
    location: String,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let file = std::fs::File::open(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?;
    let mut accounts = Accounts::new();
    let summary = read_messages(file, &mut accounts)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    log::info!(
        "Loaded {} messages for {} accounts ({} lines skipped)",
        summary.accepted,
        accounts.accounts.len(),
        summary.skipped
    );

    let mut carrier = Carrier::new(accounts, args.location);
    carrier.run(std::io::stdin().lock(), std::io::stdout())?;
    Ok(())
}
