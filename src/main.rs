//! Translate an HTML document file.
//!
//! Usage:
//!   leaf-translator <input.html> <output.html> [target]
//!
//! The target language falls back to TARGET_LANGUAGE when not given.

use anyhow::{Context, Result};
use leaf_translator::{config::Config, i18n::Language, pipeline::DocumentTranslator};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when the variables are already set)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("leaf_translator=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, output) = match (args.first(), args.get(1)) {
        (Some(input), Some(output)) => (input, output),
        _ => anyhow::bail!("Usage: leaf-translator <input.html> <output.html> [target]"),
    };

    let config = Config::from_env()?;
    let target = match args.get(2) {
        Some(code) => code.clone(),
        None => config
            .target_language
            .map(|language| language.code().to_string())
            .context("No target language: pass one as the third argument or set TARGET_LANGUAGE")?,
    };

    Language::from_code(&target)
        .with_context(|| format!("Supported languages: {}", Language::enabled_codes()))?;

    let html = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input))?;

    let translator = DocumentTranslator::from_config(&config)?;

    info!("Translating {} into {}", input, target);
    let (translated, report) = translator
        .translate_html(&html, &target, |progress| {
            info!(
                "Progress: {}/{} ({:.0}%)",
                progress.completed,
                progress.total,
                progress.fraction() * 100.0
            );
        })
        .await?;

    std::fs::write(output, translated).with_context(|| format!("Failed to write {}", output))?;

    info!(
        "Metrics: {}",
        serde_json::to_string(&translator.metrics().report())?
    );
    info!(
        "Wrote {} ({} of {} units translated by a provider)",
        output,
        report.outcomes.primary + report.outcomes.fallback,
        report.total
    );
    Ok(())
}
