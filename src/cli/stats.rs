use anyhow::Result;
use std::fmt::Write;
use std::path::Path;

use mnemos::config::MnemosConfig;
use mnemos::workspace::Workspace;

/// Load a snapshot into a fresh workspace and print its statistics.
pub fn stats(config: &MnemosConfig, file: &Path, context: Option<&str>) -> Result<()> {
    let mut workspace = Workspace::new(config);
    workspace.seed_from(file)?;
    print!("{}", render(&workspace, context)?);
    Ok(())
}

fn render(workspace: &Workspace, context: Option<&str>) -> Result<String, std::fmt::Error> {
    let stats = workspace.memory.get_stats();
    let mut out = String::new();

    writeln!(out, "Memory Statistics")?;
    writeln!(out, "{}", "=".repeat(40))?;
    writeln!(out, "  Total memories:      {}", stats.total_memories)?;
    writeln!(out, "  Average importance:  {:.2}", stats.average_importance)?;
    if let Some(oldest) = stats.oldest_memory {
        writeln!(out, "  Oldest memory:       {}", oldest.to_rfc3339())?;
    }
    if let Some(newest) = stats.newest_memory {
        writeln!(out, "  Newest memory:       {}", newest.to_rfc3339())?;
    }
    writeln!(out)?;

    let index = workspace.memory.index();
    let mut contexts: Vec<&str> = index.contexts().collect();
    contexts.sort_unstable();
    writeln!(out, "Contexts ({}):", stats.contexts)?;
    for c in contexts {
        writeln!(out, "  {c}")?;
    }
    writeln!(out)?;

    let mut tags: Vec<&str> = index.tags().collect();
    tags.sort_unstable();
    writeln!(out, "Tags ({}):", stats.tags)?;
    for t in tags {
        writeln!(out, "  {t}")?;
    }
    writeln!(out)?;

    let consolidation = workspace.memory.consolidate(context);
    if !consolidation.patterns.is_empty() {
        writeln!(out, "Shared tags:")?;
        for p in &consolidation.patterns {
            writeln!(out, "  {:<20} {}", p.tag, p.count())?;
        }
        writeln!(out)?;
    }
    out.push_str(&consolidation.summary);
    Ok(out)
}
