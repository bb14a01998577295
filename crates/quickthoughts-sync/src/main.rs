use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use quickthoughts_core::config::QuickThoughtsConfig;
use quickthoughts_sync::{run, RelayClient, SyncOptions, SyncOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "quickthoughts-sync",
    version,
    about = "Pull captured thoughts from the relay into an Obsidian note"
)]
struct Args {
    /// Path to quickthoughts.toml (default: $QUICKTHOUGHTS_CONFIG or
    /// ~/.quickthoughts/quickthoughts.toml).
    #[arg(short, long)]
    config: Option<String>,

    /// Relay base URL, e.g. https://relay.example.com
    #[arg(long, value_name = "URL")]
    relay_url: Option<String>,

    /// Sync secret printed by /setup-webhook.
    #[arg(long)]
    secret: Option<String>,

    /// Folder the note lives in.
    #[arg(long, value_name = "DIR")]
    vault: Option<PathBuf>,

    /// Note file name inside the vault.
    #[arg(long, value_name = "NAME")]
    file: Option<String>,

    /// Print the merged note; write and clear nothing.
    #[arg(long)]
    dry_run: bool,

    /// Write the note but keep the thoughts on the relay.
    #[arg(long)]
    keep: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quickthoughts_sync=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(|| std::env::var("QUICKTHOUGHTS_CONFIG").ok());
    let config = QuickThoughtsConfig::load(config_path.as_deref()).context("loading config")?;
    let client_cfg = config.client;

    let relay_url = args.relay_url.unwrap_or(client_cfg.relay_url);
    let secret = args.secret.unwrap_or(client_cfg.secret);
    let vault = args
        .vault
        .unwrap_or_else(|| PathBuf::from(client_cfg.vault_path));
    let file = args.file.unwrap_or(client_cfg.file_name);

    let client = RelayClient::new(&relay_url, &secret)?;
    let opts = SyncOptions {
        note_path: vault.join(file),
        dry_run: args.dry_run,
        keep: args.keep,
    };

    println!("🔄 Fetching thoughts from {relay_url}...");
    match run(&client, &opts).await.context("sync failed")? {
        SyncOutcome::NothingPending => println!("✨ No new thoughts to sync."),
        SyncOutcome::DryRun { fetched, rendered } => {
            println!("📥 Found {fetched} thought(s). Dry run, nothing written:\n");
            print!("{rendered}");
        }
        SyncOutcome::Written {
            fetched,
            path,
            cleared,
        } => {
            println!("📥 Found {fetched} thought(s) to sync.");
            println!("✅ Synced to {}", path.display());
            match cleared {
                Some(n) => println!("🗑️  Cleared {n} thought(s) from the relay."),
                None => println!("📌 Kept thoughts on the relay (--keep)."),
            }
            println!("🎉 Sync complete!");
        }
    }
    Ok(())
}
