use crate::output::{print_json, print_table, score_cell};
use anyhow::Context;
use specflow_core::parser::load_prd;
use specflow_core::prd::Feature;
use specflow_core::score::{QualityScore, ReadinessScorer};
use std::path::Path;

pub fn run(file: &Path, feature: Option<&str>, json: bool) -> anyhow::Result<()> {
    let prd = load_prd(file)
        .with_context(|| format!("failed to load PRD from {}", file.display()))?;

    let selected: Vec<&Feature> = match feature {
        Some(name) => vec![prd
            .feature_by_name(name)
            .with_context(|| format!("feature '{name}' not found in {}", prd.title))?],
        None => prd.features.iter().collect(),
    };

    let scorer = ReadinessScorer::new();
    let scores: Vec<QualityScore> = selected
        .iter()
        .map(|f| scorer.score_readiness(f, prd.id))
        .collect();

    if json {
        return print_json(&scores);
    }

    if scores.is_empty() {
        println!("No features in '{}'.", prd.title);
        return Ok(());
    }

    for (i, (f, s)) in selected.iter().zip(&scores).enumerate() {
        if i > 0 {
            println!();
        }
        print_breakdown(f, s);
    }
    Ok(())
}

fn print_breakdown(feature: &Feature, score: &QualityScore) {
    println!(
        "{}: {}{}",
        feature.name,
        score_cell(score),
        if score.is_ready { "  ready" } else { "" }
    );
    println!(
        "  completeness {:.1}  clarity {:.1}  testability {:.1}  feasibility {:.1}",
        score.completeness_score(),
        score.clarity_score(),
        score.testability_score(),
        score.feasibility_score()
    );

    let rows: Vec<Vec<String>> = score
        .checks
        .iter()
        .map(|c| {
            vec![
                c.category.to_string(),
                c.check_name.clone(),
                if c.passed { "pass" } else { "FAIL" }.to_string(),
                format!("{:.1}", c.score),
                c.details.clone(),
            ]
        })
        .collect();
    print_table(&["CATEGORY", "CHECK", "RESULT", "SCORE", "DETAILS"], &rows);

    for b in &score.blocking_issues {
        println!("  blocking: {b}");
    }
    for r in &score.recommendations {
        println!("  - {r}");
    }
}
