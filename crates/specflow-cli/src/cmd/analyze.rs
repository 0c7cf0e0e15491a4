use crate::output::{print_json, print_table, score_cell};
use anyhow::Context;
use specflow_core::ambiguity::{AmbiguityAnalyzer, AmbiguityIssue, AmbiguityReport};
use specflow_core::config::Config;
use specflow_core::parser::load_prd;
use specflow_core::prd::Prd;
use specflow_core::score::{QualityScore, ReadinessScorer};
use specflow_core::summary::{analyze_prd, AnalysisSummary};
use std::path::Path;

/// Which engines `analyze` runs.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub ambiguities: bool,
    pub quality: bool,
    pub ai: bool,
}

enum Outcome {
    Full(AnalysisSummary),
    Ambiguities(AmbiguityReport),
    Scores(Vec<QualityScore>),
}

impl Outcome {
    fn report(&self) -> Option<&AmbiguityReport> {
        match self {
            Outcome::Full(s) => Some(&s.ambiguity_report),
            Outcome::Ambiguities(r) => Some(r),
            Outcome::Scores(_) => None,
        }
    }

    fn scores(&self) -> Option<&[QualityScore]> {
        match self {
            Outcome::Full(s) => Some(s.quality_scores.as_slice()),
            Outcome::Scores(s) => Some(s.as_slice()),
            Outcome::Ambiguities(_) => None,
        }
    }

    fn summary(&self) -> Option<&AnalysisSummary> {
        match self {
            Outcome::Full(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(serde::Serialize)]
struct AnalyzeOutput<'a> {
    prd_id: String,
    prd_title: &'a str,
    feature_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    ambiguity_report: Option<&'a AmbiguityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality_scores: Option<&'a [QualityScore]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overall_readiness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ready_for_tickets: Option<bool>,
    estimated_implementation_days: f64,
}

pub fn run(root: &Path, file: &Path, opts: Options, json: bool) -> anyhow::Result<()> {
    let prd = load_prd(file)
        .with_context(|| format!("failed to load PRD from {}", file.display()))?;

    let analyzer = if opts.ai {
        let config = Config::load(root).context("failed to load config")?;
        AmbiguityAnalyzer::from_config(&config)
    } else {
        AmbiguityAnalyzer::pattern_only()
    };
    let scorer = ReadinessScorer::new();

    let outcome = match (opts.ambiguities, opts.quality) {
        (true, true) => Outcome::Full(analyze_prd(&prd, &analyzer, &scorer)),
        (true, false) => Outcome::Ambiguities(analyzer.detect_ambiguities(&prd)),
        (false, true) => Outcome::Scores(scorer.score_all(&prd)),
        (false, false) => {
            anyhow::bail!("nothing to analyze: both --no-ambiguities and --no-quality given")
        }
    };
    let effort_days: f64 = prd.features.iter().filter_map(|f| f.effort_days()).sum();

    if json {
        return print_json(&AnalyzeOutput {
            prd_id: prd.id.to_string(),
            prd_title: &prd.title,
            feature_count: prd.feature_count(),
            ambiguity_report: outcome.report(),
            quality_scores: outcome.scores(),
            overall_readiness: outcome.summary().map(|s| s.overall_readiness),
            ready_for_tickets: outcome.summary().map(AnalysisSummary::is_ready_for_tickets),
            estimated_implementation_days: effort_days,
        });
    }

    println!("PRD: {} ({} features)", prd.title, prd.feature_count());
    if let Some(report) = outcome.report() {
        print_ambiguities(&prd, report);
    }
    if let Some(scores) = outcome.scores() {
        print_scores(&prd, scores);
    }

    println!();
    if let Some(summary) = outcome.summary() {
        println!("Overall readiness: {:.2}", summary.overall_readiness);
        println!(
            "Ready for tickets: {}",
            if summary.is_ready_for_tickets() { "yes" } else { "no" }
        );
    }
    println!("Estimated effort:  {effort_days} days");
    Ok(())
}

fn feature_name<'a>(prd: &'a Prd, issue: &AmbiguityIssue) -> &'a str {
    issue
        .feature_id
        .and_then(|id| prd.features.iter().find(|f| f.id == id))
        .map_or("-", |f| f.name.as_str())
}

fn print_ambiguities(prd: &Prd, report: &AmbiguityReport) {
    println!();
    println!(
        "Ambiguities ({}): {} found, {} critical, {} high",
        report.ai_model_used,
        report.total_issues(),
        report.critical_count(),
        report.high_count()
    );
    if report.issues.is_empty() {
        return;
    }
    // Most severe first; the sort is stable so detection order breaks ties.
    let mut issues: Vec<&AmbiguityIssue> = report.issues.iter().collect();
    issues.sort_by_key(|i| std::cmp::Reverse(i.severity.rank()));
    let rows: Vec<Vec<String>> = issues
        .into_iter()
        .map(|i| {
            vec![
                i.severity.to_string(),
                i.ambiguity_type.to_string(),
                i.original_text.clone(),
                feature_name(prd, i).to_string(),
                i.suggestion.clone(),
            ]
        })
        .collect();
    print_table(&["SEVERITY", "TYPE", "TEXT", "FEATURE", "SUGGESTION"], &rows);
}

fn print_scores(prd: &Prd, scores: &[QualityScore]) {
    println!();
    println!("Readiness:");
    if scores.is_empty() {
        println!("  (no features)");
        return;
    }
    let rows: Vec<Vec<String>> = prd
        .features
        .iter()
        .zip(scores)
        .map(|(f, s)| {
            vec![
                f.name.clone(),
                score_cell(s),
                if s.is_ready { "yes" } else { "no" }.to_string(),
                s.blocking_issues.join("; "),
            ]
        })
        .collect();
    print_table(&["FEATURE", "SCORE", "READY", "BLOCKING"], &rows);
}
