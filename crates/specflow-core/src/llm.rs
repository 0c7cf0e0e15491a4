//! HTTP-backed [`AiAnalyst`] speaking the Anthropic Messages protocol.
//!
//! The model is asked for a single JSON object `{"issues": [...]}`. Any
//! failure (transport, status, undecodable reply) surfaces as an error for
//! the caller to absorb.

use crate::ambiguity::{AiAnalyst, AmbiguityIssue, FeatureText};
use crate::config::AiConfig;
use crate::error::{Result, SpecflowError};
use crate::types::{AmbiguityType, Severity};
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";

const SYSTEM_PROMPT: &str = r#"You are an expert at analyzing product requirements for clarity and completeness.

Identify ambiguities, vague terms and unclear requirements of these types:
- vague_term: subjective terms like "fast", "easy", "user-friendly"
- missing_metric: quantities without numbers ("many users", "quickly")
- subjective_language: preference terms ("beautiful", "intuitive")
- missing_context: unclear who, what, when or where
- unclear_dependency: relationships between features that are not spelled out
- incomplete_condition: missing if/then/else cases

Severity is one of: critical (blocks implementation), high (likely confusion),
medium (should clarify), low (nice to clarify).

Reply with a single JSON object and nothing else:
{"issues": [{"feature": "<feature name>", "ambiguity_type": "...", "severity": "...",
"original_text": "...", "explanation": "...", "suggestion": "..."}]}

Suggestions must be specific ("Specify load time under 200ms", not "add metrics").
Focus on issues that would cause confusion during implementation."#;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<RequestMessage>,
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct IssueList {
    #[serde(default)]
    issues: Vec<ReportedIssue>,
}

#[derive(Debug, Deserialize)]
struct ReportedIssue {
    #[serde(default)]
    feature: Option<String>,
    ambiguity_type: AmbiguityType,
    severity: Severity,
    original_text: String,
    explanation: String,
    suggestion: String,
}

// ---------------------------------------------------------------------------
// MessagesAnalyst
// ---------------------------------------------------------------------------

pub struct MessagesAnalyst {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl MessagesAnalyst {
    pub fn new(config: &AiConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/v1/messages", config.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Reads the key from the environment variable named in `config`.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let key = config.api_key()?;
        Self::new(config, key)
    }
}

fn build_prompt(prd_title: &str, features: &[FeatureText<'_>]) -> String {
    let features_text = features
        .iter()
        .map(|f| format!("Feature: {}\nDescription: {}", f.name, f.description))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "PRD Title: {prd_title}\n\nFeatures to analyze:\n{features_text}\n\n\
         Identify ambiguities, vague terms, missing metrics, and unclear requirements.\n\
         Focus on issues that would cause confusion during implementation."
    )
}

/// Slice out the outermost `{...}` so fenced or chatty replies still parse.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_reply(text: &str, features: &[FeatureText<'_>]) -> Result<Vec<AmbiguityIssue>> {
    let json = extract_json(text)
        .ok_or_else(|| SpecflowError::Ai("reply contained no JSON object".to_string()))?;
    let list: IssueList = serde_json::from_str(json)?;
    Ok(list
        .issues
        .into_iter()
        .map(|r| {
            let feature_id = r.feature.as_deref().and_then(|name| {
                features
                    .iter()
                    .find(|f| f.name.eq_ignore_ascii_case(name.trim()))
                    .map(|f| f.id)
            });
            AmbiguityIssue::new(
                feature_id,
                r.ambiguity_type,
                r.severity,
                r.original_text,
                r.explanation,
                r.suggestion,
            )
        })
        .collect())
}

impl AiAnalyst for MessagesAnalyst {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn analyze(
        &self,
        prd_title: &str,
        features: &[FeatureText<'_>],
    ) -> Result<Vec<AmbiguityIssue>> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: SYSTEM_PROMPT,
            messages: vec![RequestMessage {
                role: "user",
                content: build_prompt(prd_title, features),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SpecflowError::Ai(format!("{status}: {body}")));
        }

        let reply: MessagesResponse = response.json()?;
        let text = reply
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .ok_or_else(|| SpecflowError::Ai("reply had no text content".to_string()))?;

        parse_reply(&text, features)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambiguity::AmbiguityAnalyzer;
    use crate::prd::{Feature, Prd};
    use uuid::Uuid;

    fn config_for(url: &str) -> AiConfig {
        AiConfig {
            enabled: true,
            model: "test-model".to_string(),
            base_url: url.to_string(),
            timeout_seconds: 5,
            ..AiConfig::default()
        }
    }

    fn reply_body(text: &str) -> String {
        serde_json::json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": text}],
        })
        .to_string()
    }

    const ISSUES_JSON: &str = r#"{"issues": [{"feature": "dashboard", "ambiguity_type": "missing_context", "severity": "critical", "original_text": "the dashboard", "explanation": "Audience is unspecified", "suggestion": "Name the roles that can open it"}]}"#;

    #[test]
    fn extract_json_strips_fences() {
        let text = "Here you go:\n```json\n{\"issues\": []}\n```";
        assert_eq!(extract_json(text), Some("{\"issues\": []}"));
        assert_eq!(extract_json("no json"), None);
    }

    #[test]
    fn parse_reply_maps_feature_names() {
        let id = Uuid::new_v4();
        let features = [FeatureText {
            id,
            name: "Dashboard",
            description: "A dashboard",
        }];
        let issues = parse_reply(ISSUES_JSON, &features).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].feature_id, Some(id));
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].ambiguity_type, AmbiguityType::MissingContext);
    }

    #[test]
    fn parse_reply_rejects_unknown_enum() {
        let text = r#"{"issues": [{"ambiguity_type": "weird", "severity": "low", "original_text": "x", "explanation": "y", "suggestion": "z"}]}"#;
        assert!(parse_reply(text, &[]).is_err());
    }

    #[test]
    fn prompt_lists_every_feature() {
        let features = [
            FeatureText { id: Uuid::new_v4(), name: "A", description: "first" },
            FeatureText { id: Uuid::new_v4(), name: "B", description: "second" },
        ];
        let prompt = build_prompt("Doc", &features);
        assert!(prompt.starts_with("PRD Title: Doc"));
        assert!(prompt.contains("Feature: A\nDescription: first"));
        assert!(prompt.contains("Feature: B\nDescription: second"));
    }

    #[test]
    fn analyze_calls_messages_endpoint() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "secret")
            .match_header("anthropic-version", ANTHROPIC_VERSION)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply_body(ISSUES_JSON))
            .create();

        let analyst = MessagesAnalyst::new(&config_for(&server.url()), "secret").unwrap();
        let features = [FeatureText {
            id: Uuid::new_v4(),
            name: "Dashboard",
            description: "A dashboard",
        }];
        let issues = analyst.analyze("Doc", &features).unwrap();
        mock.assert();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].original_text, "the dashboard");
    }

    #[test]
    fn server_error_is_an_ai_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .with_body("overloaded")
            .create();

        let analyst = MessagesAnalyst::new(&config_for(&server.url()), "secret").unwrap();
        let err = analyst.analyze("Doc", &[]).unwrap_err();
        assert!(matches!(err, SpecflowError::Ai(_)));
        assert!(err.to_string().contains("overloaded"));
    }

    #[test]
    fn analyzer_keeps_lexical_issues_when_endpoint_fails() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(500)
            .create();

        let analyst = MessagesAnalyst::new(&config_for(&server.url()), "secret").unwrap();
        let analyzer = AmbiguityAnalyzer::with_ai(Box::new(analyst));
        let prd = Prd::new("Doc", "")
            .with_features(vec![Feature::new("Search", "Search must be fast")]);
        let report = analyzer.detect_ambiguities(&prd);
        assert_eq!(report.total_issues(), 1);
        assert_eq!(report.issues[0].original_text, "fast");
        assert_eq!(report.ai_model_used, "test-model");
    }

    #[test]
    fn analyzer_appends_ai_issues() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply_body(ISSUES_JSON))
            .create();

        let analyst = MessagesAnalyst::new(&config_for(&server.url()), "secret").unwrap();
        let analyzer = AmbiguityAnalyzer::with_ai(Box::new(analyst));
        let prd = Prd::new("Doc", "").with_features(vec![Feature::new(
            "Dashboard",
            "Shows many charts",
        )]);
        let report = analyzer.detect_ambiguities(&prd);
        let texts: Vec<&str> = report.issues.iter().map(|i| i.original_text.as_str()).collect();
        assert_eq!(texts, vec!["many", "the dashboard"]);
        assert_eq!(report.issues[1].feature_id, Some(prd.features[0].id));
        assert!(report.has_blocking_issues());
    }
}
