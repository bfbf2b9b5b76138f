//! `starlet image` -- one-shot image generation.

use std::path::PathBuf;

use anyhow::{Result, bail};
use console::style;

use starlet_infra::config::parse_aspect_ratio;
use starlet_infra::factory::{build_client, build_image_tool};
use starlet_types::config::ServiceConfig;
use starlet_types::tool::ToolOutcome;

/// Generate one image and report where it was written.
///
/// An explicit `aspect_ratio` replaces the configured mode for this call.
pub async fn generate(
    config: &ServiceConfig,
    prompt: &str,
    aspect_ratio: Option<&str>,
    output_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(dir) = output_dir {
        config.image_dir = dir;
    }
    if let Some(ratio) = aspect_ratio {
        config.aspect_ratio = parse_aspect_ratio("--aspect-ratio", ratio)?;
    }

    let tool = build_image_tool(build_client(&config)?, &config);
    let outcome = tool.generate_image(prompt, None).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        if !outcome.is_success() {
            bail!("{}", outcome.message());
        }
        return Ok(());
    }

    match outcome {
        ToolOutcome::Success { filename, .. } => {
            let path = config.image_dir.join(&filename);
            println!();
            println!(
                "  {} Image saved to {}",
                style("✓").green().bold(),
                style(path.display()).cyan()
            );
            Ok(())
        }
        ToolOutcome::Error { message } => bail!(message),
    }
}
