use crate::output::{print_json, print_table};
use anyhow::Context;
use specflow_core::io::atomic_write;
use specflow_core::parser::load_prd;
use std::path::Path;

pub fn run(file: &Path, output: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let prd = load_prd(file)
        .with_context(|| format!("failed to load PRD from {}", file.display()))?;

    if let Some(out) = output {
        let data = serde_json::to_vec_pretty(&prd)?;
        atomic_write(out, &data).with_context(|| format!("failed to write {}", out.display()))?;
        if !json {
            println!("Wrote parsed PRD to {}", out.display());
        }
    }

    if json {
        return print_json(&prd);
    }

    println!("Title:        {}", prd.title);
    println!("Sections:     {}", prd.sections.len());
    println!("Features:     {}", prd.feature_count());
    println!("Requirements: {}", prd.total_requirements());
    println!("Complete:     {:.0}%", prd.completion_percentage());

    if prd.features.is_empty() {
        return Ok(());
    }

    println!();
    let rows: Vec<Vec<String>> = prd
        .features
        .iter()
        .map(|f| {
            vec![
                f.name.clone(),
                f.priority.to_string(),
                f.requirement_count().to_string(),
                f.acceptance_criteria_count().to_string(),
                f.edge_cases.len().to_string(),
            ]
        })
        .collect();
    print_table(&["FEATURE", "PRIORITY", "REQS", "CRITERIA", "EDGE CASES"], &rows);
    Ok(())
}
