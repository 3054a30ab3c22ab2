//! Preview binary - translates one string and shows which tier answered
//!
//! Usage:
//!   cargo run --bin preview -- yo "Welcome to the community"
//!
//! Reads the same environment variables as the main binary.

use anyhow::{Context, Result};
use leaf_translator::{config::Config, i18n::Language, pipeline::DocumentTranslator};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("leaf_translator=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let target = args
        .next()
        .context("Usage: preview <target> <text...>")?;
    let text = args.collect::<Vec<_>>().join(" ");
    if text.trim().is_empty() {
        anyhow::bail!("Usage: preview <target> <text...>");
    }

    let target = Language::from_code(&target)
        .with_context(|| format!("Supported languages: {}", Language::enabled_codes()))?;

    info!("Loading configuration...");
    let config = Config::from_env()?;
    let pipeline = DocumentTranslator::from_config(&config)?;

    let translation = pipeline.translator().translate(&text, target, None).await;

    println!("\n========== TRANSLATION PREVIEW ==========");
    println!(
        "{} -> {} ({})",
        pipeline.translator().source_language().name(),
        target.name(),
        target.native_name()
    );
    println!("Source:      {}", text);
    println!("Translation: {}", translation.text);
    println!(
        "Tier:        {}",
        serde_json::to_string(&translation.outcome)?.trim_matches('"')
    );
    println!("=========================================\n");

    Ok(())
}
