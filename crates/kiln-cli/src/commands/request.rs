//! Asset request commands: single, batch and preset

use super::{split_list, Context, OutputFormat};
use anyhow::{bail, Result};
use kiln_asset_gen::{AssetNeed, AssetResult, BatchSummary, NeedDocument, ProjectPreset};
use kiln_core::AssetFamily;
use std::path::Path;

pub struct RequestArgs {
    pub family: String,
    pub description: String,
    pub category: Option<String>,
    pub dimensions: Option<(u32, u32)>,
    pub attributes: Vec<(String, String)>,
    pub tags: Option<String>,
    pub project: Option<String>,
}

impl RequestArgs {
    fn into_need(self) -> Result<AssetNeed> {
        let family: AssetFamily = self.family.parse()?;
        let mut need = AssetNeed::new(family, self.description);
        if let Some(category) = self.category {
            need = need.category(category);
        }
        if let Some((width, height)) = self.dimensions {
            need = need.dimensions(width, height);
        }
        for (key, value) in self.attributes {
            need = need.attribute(key, value);
        }
        for tag in split_list(self.tags.as_deref()) {
            need = need.tag(tag);
        }
        if let Some(project) = self.project {
            need = need.project(project);
        }
        Ok(need)
    }
}

pub fn run_request(ctx: &Context, args: RequestArgs) -> Result<()> {
    let need = args.into_need()?;
    let result = ctx.pipeline().request(&need);

    match ctx.format {
        OutputFormat::Json => ctx.print_json(&result)?,
        OutputFormat::Text => print_result(&result),
    }

    if !result.success {
        bail!(
            "{}",
            result.error.unwrap_or_else(|| "request failed".to_string())
        );
    }
    Ok(())
}

pub fn run_batch(ctx: &Context, file: &str) -> Result<()> {
    let document = NeedDocument::load(Path::new(file))?;
    if document.need.is_empty() {
        println!("No [[need]] entries in {}", file);
        return Ok(());
    }
    let results = ctx.pipeline().request_batch(&document.need);
    report(ctx, &results)
}

pub fn run_preset(ctx: &Context, archetype: &str, project: &str) -> Result<()> {
    let preset: ProjectPreset = archetype.parse()?;
    let results = ctx.pipeline().request_preset(preset, project);
    report(ctx, &results)
}

fn report(ctx: &Context, results: &[AssetResult]) -> Result<()> {
    let summary = BatchSummary::tally(results);
    match ctx.format {
        OutputFormat::Json => ctx.print_json(&results)?,
        OutputFormat::Text => {
            for result in results {
                print_result(result);
            }
            println!();
            println!(
                "{} request(s): {} generated, {} reused, {} failed",
                results.len(),
                summary.generated,
                summary.reused,
                summary.failed
            );
        }
    }

    if summary.failed > 0 {
        bail!("{} of {} request(s) failed", summary.failed, results.len());
    }
    Ok(())
}

fn print_result(result: &AssetResult) {
    match (&result.reference, &result.error) {
        (Some(reference), _) => {
            let how = if result.reused { "reused" } else { "generated" };
            println!("OK    {} ({})", reference.id, how);
            println!("      symbol: {}", reference.symbol_name);
            println!("      path:   {}", reference.path);
            println!("      size:   {}", reference.dimensions);
        }
        (None, Some(error)) => println!("FAIL  {}", error),
        (None, None) => println!("FAIL  unknown error"),
    }
    if let Some(decision) = &result.decision {
        println!(
            "      decision: {} (confidence {:.2})",
            decision.rationale, decision.confidence
        );
    }
    for warning in &result.warnings {
        println!("      warning: {}", warning);
    }
    if let Some(validation) = &result.validation {
        if !validation.passed {
            validation.print_summary();
        }
    }
}
