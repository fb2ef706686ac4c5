//! Registry inspection commands

use super::{split_list, Context, OutputFormat};
use anyhow::Result;
use kiln_core::{AssetFamily, Dimensions, KilnError};
use kiln_registry::{RegistryEntry, RegistryQuery};

pub struct SearchArgs {
    pub family: Option<String>,
    pub category: Option<String>,
    pub project: Option<String>,
    pub tags: Option<String>,
    pub dimensions: Option<String>,
    pub all: bool,
}

impl SearchArgs {
    fn into_query(self) -> Result<RegistryQuery> {
        let mut query = RegistryQuery::new();
        if let Some(family) = self.family {
            query = query.family(family.parse::<AssetFamily>()?);
        }
        if let Some(category) = self.category {
            query = query.category(category);
        }
        if let Some(project) = self.project {
            query = query.project(project);
        }
        for tag in split_list(self.tags.as_deref()) {
            query = query.tag(tag);
        }
        if let Some(dims) = self.dimensions {
            query = query.dimensions(dims.parse::<Dimensions>()?);
        }
        if self.all {
            query = query.include_deprecated();
        }
        Ok(query)
    }
}

pub fn run_search(ctx: &Context, args: SearchArgs) -> Result<()> {
    let registry = ctx.registry();
    let entries = registry.search(&args.into_query()?)?;

    match ctx.format {
        OutputFormat::Json => ctx.print_json(&entries)?,
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No matching assets in {}", registry.location());
                return Ok(());
            }
            for entry in &entries {
                println!(
                    "{:<48} {:>9}  {:<28} [{}]",
                    entry.id,
                    entry.dimensions.to_string(),
                    entry.method.to_string(),
                    entry.tags.join(", ")
                );
            }
            println!("\n{} asset(s)", entries.len());
        }
    }
    Ok(())
}

pub fn run_show(ctx: &Context, id: &str) -> Result<()> {
    let registry = ctx.registry();
    let entry = registry
        .get(id)?
        .ok_or_else(|| KilnError::AssetNotFound(id.to_string()))?;
    let deprecation = registry.deprecations()?.into_iter().find(|d| d.id == id);

    match ctx.format {
        OutputFormat::Json => ctx.print_json(&serde_json::json!({
            "entry": entry,
            "deprecation": deprecation,
        }))?,
        OutputFormat::Text => {
            print_entry(&entry);
            if let Some(d) = deprecation {
                println!("Deprecated:  {} ({})", d.reason, d.deprecated_at);
            }
        }
    }
    Ok(())
}

pub fn run_deprecate(ctx: &Context, id: &str, reason: &str) -> Result<()> {
    let registry = ctx.registry();
    if registry.deprecate(id, reason)? {
        println!("Deprecated {}: {}", id, reason);
    } else {
        println!("{} was already deprecated", id);
    }
    Ok(())
}

fn print_entry(entry: &RegistryEntry) {
    println!("Id:          {}", entry.id);
    println!("Symbol:      {}", entry.symbol_name);
    println!("Family:      {}", entry.family);
    if let Some(category) = &entry.category {
        println!("Category:    {}", category);
    }
    if let Some(project) = &entry.project {
        println!("Project:     {}", project);
    }
    println!("Path:        {}", entry.path);
    println!("Dimensions:  {}", entry.dimensions);
    println!("Method:      {}", entry.method);
    println!("Seed:        {}", entry.seed);
    println!("Size:        {} bytes", entry.byte_size);
    println!("Hash:        {}", entry.content_hash);
    println!("Created:     {}", entry.created_at);
    if !entry.tags.is_empty() {
        println!("Tags:        {}", entry.tags.join(", "));
    }
    for aux in &entry.auxiliary {
        println!("Auxiliary:   {}", aux);
    }
    if !entry.description.is_empty() {
        println!("Description: {}", entry.description);
    }
}
