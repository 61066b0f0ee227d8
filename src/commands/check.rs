//! `targetscope check` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::error::Result;
use crate::matcher::{PatternSource, UnitMatcher};
use crate::metadata::ProjectMetadata;
use crate::report::load_unit_metadata;

/// One line of the `check` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRow {
    /// Unit name.
    pub name: String,
    /// `infra` or `product`.
    pub tier: String,
    /// Priority within the tier.
    pub priority: i64,
    /// Repository-relative unit path.
    pub path: String,
    /// What was found on disk.
    pub status: String,
}

/// Validates the project and every present unit's metadata.
///
/// # Errors
///
/// Returns the first configuration or environment error encountered.
pub fn run_with_context(
    ctx: &ServiceContext,
    metadata_path: &Path,
    root: &Path,
) -> Result<Vec<CheckRow>> {
    let project = ProjectMetadata::load(ctx.fs.as_ref(), metadata_path)?;
    let matcher = UnitMatcher::build(&project, ctx.fs.as_ref(), root)?;

    let mut rows = Vec::new();
    for unit in project.units() {
        let source = matcher.source(&unit.name);
        let metadata = load_unit_metadata(&unit, source, ctx.fs.as_ref(), root)?;
        let status = match (source, metadata) {
            (_, Some(metadata)) => format!("ok ({} versions)", metadata.properties.len()),
            (Some(PatternSource::Verbatim), None) => "pattern".to_string(),
            _ if ctx.fs.exists(&root.join(&unit.path)) => "not a directory".to_string(),
            _ => "absent".to_string(),
        };
        rows.push(CheckRow {
            name: unit.name,
            tier: unit.tier.to_string(),
            priority: unit.priority,
            path: unit.path,
            status,
        });
    }
    Ok(rows)
}

/// Execute the `check` command.
///
/// Prints a table of all declared units with tier, priority, path and
/// whether their directory and metadata were found.
///
/// # Errors
///
/// See [`run_with_context`].
pub fn run(ctx: &ServiceContext, metadata_path: &Path, root: &Path) -> Result<()> {
    let rows = run_with_context(ctx, metadata_path, root)?;
    if rows.is_empty() {
        println!("No units declared in {}.", metadata_path.display());
        return Ok(());
    }
    print!("{}", render_table(&rows));
    println!("\n{} unit(s) total.", rows.len());
    Ok(())
}

fn render_table(rows: &[CheckRow]) -> String {
    let priorities: Vec<String> = rows.iter().map(|r| r.priority.to_string()).collect();

    // Calculate column widths.
    let name_width = rows.iter().map(|r| r.name.len()).max().unwrap_or(4).max(4);
    let tier_width = rows.iter().map(|r| r.tier.len()).max().unwrap_or(4).max(4);
    let priority_width = priorities.iter().map(String::len).max().unwrap_or(8).max(8);
    let path_width = rows.iter().map(|r| r.path.len()).max().unwrap_or(4).max(4);

    let mut lines = vec![
        format!(
            "{:<name_width$}  {:<tier_width$}  {:<priority_width$}  {:<path_width$}  STATUS",
            "NAME", "TIER", "PRIORITY", "PATH",
        ),
        format!(
            "{:-<name_width$}  {:-<tier_width$}  {:-<priority_width$}  {:-<path_width$}  ------",
            "", "", "", "",
        ),
    ];
    for (row, priority) in rows.iter().zip(&priorities) {
        lines.push(format!(
            "{:<name_width$}  {:<tier_width$}  {priority:<priority_width$}  {:<path_width$}  {}",
            row.name, row.tier, row.path, row.status,
        ));
    }
    lines.join("\n") + "\n"
}
