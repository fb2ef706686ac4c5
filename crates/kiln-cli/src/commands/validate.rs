//! Standalone quality check of an asset file

use super::{Context, OutputFormat};
use anyhow::{bail, Context as _, Result};
use kiln_asset_gen::QualityValidator;
use kiln_core::{AssetFamily, Dimensions};
use std::path::Path;

pub fn run(ctx: &Context, path: &str, family: &str, width: u32, height: u32) -> Result<()> {
    let family: AssetFamily = family.parse()?;
    let file = Path::new(path);
    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let payload = std::fs::read(file).with_context(|| format!("Failed to read {}", path))?;

    let validator = QualityValidator::new(ctx.config.validation);
    let result = validator.validate_file(&payload, &extension, family, Dimensions::new(width, height));

    match ctx.format {
        OutputFormat::Json => ctx.print_json(&result)?,
        OutputFormat::Text => {
            println!("Validating {} as {} {}x{}", path, family, width, height);
            result.print_summary();
            for warning in &result.warnings {
                println!("  warning: {}", warning);
            }
        }
    }

    if !result.passed {
        bail!("{} failed {} check(s)", path, result.errors.len());
    }
    if ctx.format == OutputFormat::Text {
        println!("All checks passed.");
    }
    Ok(())
}
