//! Markdown PRD parser and format-sniffing loader.
//!
//! Markdown layout: `#` title, `##` sections, `###` features. Inside a
//! feature, bold labels (`**Requirements:**`, `**Acceptance Criteria:**`,
//! `**Edge Cases:**`) introduce bullet or numbered lists.

use crate::error::{Result, SpecflowError};
use crate::prd::{Feature, Prd, PrdMetadata, PrdSection, Requirement};
use crate::types::RequirementType;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use uuid::Uuid;

const NO_DESCRIPTION: &str = "No description provided";

fn h1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^#[ \t]+(\S[^\n]*)$").unwrap())
}

fn h2_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^##[ \t]+(\S[^\n]*)$").unwrap())
}

fn h3_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^###[ \t]+(\S[^\n]*)$").unwrap())
}

/// Any H2 or deeper header; ends a feature body.
fn subheader_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^##").unwrap())
}

fn label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\*\*(?:Requirements|Acceptance Criteria|Edge Cases):").unwrap()
    })
}

fn list_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*(?:[-*+]|\d+[.)])\s+(.+?)\s*$").unwrap())
}

/// Labelled list blocks, in `Requirements`, `Acceptance Criteria`,
/// `Edge Cases` order.
fn list_block_res() -> &'static [Regex; 3] {
    static RES: OnceLock<[Regex; 3]> = OnceLock::new();
    RES.get_or_init(|| {
        ["Requirements", "Acceptance Criteria", "Edge Cases"].map(|label| {
            Regex::new(&format!(
                r"\*\*{label}:\*\*[ \t]*\r?\n\s*((?:[-*+\d].*(?:\r?\n|$))+)"
            ))
            .unwrap()
        })
    })
}

// ---------------------------------------------------------------------------
// Markdown
// ---------------------------------------------------------------------------

pub fn parse_markdown(content: &str) -> Result<Prd> {
    if content.trim().is_empty() {
        return Err(SpecflowError::InvalidFormat(
            "content must be a non-empty markdown string".to_string(),
        ));
    }

    let title = h1_re()
        .captures(content)
        .map(|c| c[1].trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            SpecflowError::InvalidFormat("PRD must have a title (H1 header)".to_string())
        })?;

    let sections = parse_sections(content);
    let features = parse_features(content);

    tracing::info!(
        title = %title,
        features = features.len(),
        sections = sections.len(),
        "parsed markdown PRD"
    );

    let mut prd = Prd::new(title, content).with_features(features);
    prd.sections = sections;
    prd.metadata = PrdMetadata {
        source_format: Some("markdown".to_string()),
        ..PrdMetadata::default()
    };
    Ok(prd)
}

fn parse_sections(content: &str) -> Vec<PrdSection> {
    let headers: Vec<_> = h2_re().captures_iter(content).collect();
    headers
        .iter()
        .enumerate()
        .map(|(order, caps)| {
            let start = caps.get(0).map_or(0, |m| m.end());
            let end = headers
                .get(order + 1)
                .and_then(|next| next.get(0))
                .map_or(content.len(), |m| m.start());
            PrdSection {
                id: Uuid::new_v4(),
                title: caps[1].trim().to_string(),
                content: content[start..end].trim().to_string(),
                order,
            }
        })
        .collect()
}

fn parse_features(content: &str) -> Vec<Feature> {
    h3_re()
        .captures_iter(content)
        .map(|caps| {
            let start = caps.get(0).map_or(0, |m| m.end());
            let end = subheader_re()
                .find(&content[start..])
                .map_or(content.len(), |m| start + m.start());
            let body = content[start..end].trim();

            let [requirements, criteria, edge_cases] = labelled_lists(body);
            let description = extract_description(body);

            Feature::new(
                caps[1].trim(),
                if description.is_empty() { NO_DESCRIPTION } else { description },
            )
            .with_requirements(
                requirements
                    .into_iter()
                    .map(|r| Requirement::new(r, RequirementType::Functional))
                    .collect(),
            )
            .with_acceptance_criteria(criteria)
            .with_edge_cases(edge_cases)
        })
        .collect()
}

/// Text before the first bold list label, else the first paragraph.
fn extract_description(body: &str) -> &str {
    match label_re().find(body) {
        Some(m) => body[..m.start()].trim(),
        None => body.split("\n\n").next().unwrap_or("").trim(),
    }
}

fn labelled_lists(body: &str) -> [Vec<String>; 3] {
    list_block_res().each_ref().map(|re| {
        re.captures(body)
            .map(|caps| {
                list_item_re()
                    .captures_iter(&caps[1])
                    .map(|item| item[1].to_string())
                    .filter(|item| !item.is_empty())
                    .collect::<Vec<String>>()
            })
            .unwrap_or_default()
    })
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Load a PRD from disk, choosing the format by extension. Unknown
/// extensions are sniffed: a leading `{` is tried as JSON, anything else
/// (or JSON that fails to decode) is parsed as markdown.
pub fn load_prd(path: &Path) -> Result<Prd> {
    let content = std::fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("json") => validated(serde_json::from_str(&content)?),
        Some("yaml" | "yml") => validated(serde_yaml::from_str(&content)?),
        Some("md" | "markdown") => parse_markdown(&content),
        _ if content.trim_start().starts_with('{') => match serde_json::from_str(&content) {
            Ok(prd) => validated(prd),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "not a JSON PRD, trying markdown");
                parse_markdown(&content)
            }
        },
        _ => parse_markdown(&content),
    }
}

fn validated(prd: Prd) -> Result<Prd> {
    prd.validate()?;
    Ok(prd)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
