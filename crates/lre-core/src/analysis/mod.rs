//! Image analysis.
//!
//! Sends an uploaded image to a multimodal model and turns the JSON it
//! returns into a validated [`AnalysisOutcome`].

pub mod gemini;
pub mod model;
pub mod schema;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LreError, LreResult};
use crate::ingest::UploadedImage;
use model::AnalysisResult;

/// Something that can analyze an image. Implemented by the Gemini client and
/// by test doubles.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// One request, one validated outcome.
    async fn analyze(&self, image: &UploadedImage) -> LreResult<AnalysisOutcome>;
}

/// A parsed response, checked against the required fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// Every required field was present.
    Complete { result: AnalysisResult },
    /// Some fields were absent and have been left empty.
    Partial {
        result: AnalysisResult,
        missing: Vec<String>,
    },
}

impl AnalysisOutcome {
    pub fn result(&self) -> &AnalysisResult {
        match self {
            Self::Complete { result } | Self::Partial { result, .. } => result,
        }
    }

    /// Dotted paths of absent fields; empty when complete.
    pub fn missing(&self) -> &[String] {
        match self {
            Self::Complete { .. } => &[],
            Self::Partial { missing, .. } => missing,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

/// Parse the text returned by the service.
///
/// An empty body is an error. A JSON object carrying none of the top-level
/// keys is an error too, since there is nothing to show.
pub fn parse_analysis(text: &str) -> LreResult<AnalysisOutcome> {
    let json_str = extract_json(text);
    if json_str.is_empty() {
        return Err(LreError::EmptyResponse);
    }

    let mut value: Value = serde_json::from_str(&json_str)?;
    let object = value
        .as_object()
        .ok_or_else(|| LreError::malformed("expected a JSON object"))?;

    let known = schema::SECTIONS
        .iter()
        .map(|s| s.key)
        .chain(std::iter::once(schema::EXPLANATION.key));
    let mut has_any = false;
    for key in known {
        has_any |= object.contains_key(key);
    }
    if !has_any {
        return Err(LreError::malformed("no analysis fields in response"));
    }

    let missing = missing_paths(&value);
    prune_nulls(&mut value);
    let result: AnalysisResult = serde_json::from_value(value)?;

    if missing.is_empty() {
        Ok(AnalysisOutcome::Complete { result })
    } else {
        Ok(AnalysisOutcome::Partial { result, missing })
    }
}

/// Required paths absent (or null) in `value`. A missing section reports the
/// section only, not each of its fields.
fn missing_paths(value: &Value) -> Vec<String> {
    let present = |v: Option<&Value>| v.is_some_and(|v| !v.is_null());
    let mut missing = Vec::new();

    for section in schema::SECTIONS {
        let node = value.get(section.key);
        if !present(node) {
            missing.push(section.key.to_string());
            continue;
        }
        for field in section.fields {
            if !present(node.and_then(|n| n.get(field.key))) {
                missing.push(format!("{}.{}", section.key, field.key));
            }
        }
    }

    if !present(value.get(schema::EXPLANATION.key)) {
        missing.push(schema::EXPLANATION.key.to_string());
    }
    missing
}

/// Drop null members so they fall back to their empty defaults.
fn prune_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(prune_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(prune_nulls),
        _ => {}
    }
}

/// Extract JSON from a string that might be wrapped in a markdown code block.
///
/// Only a fence around the whole text is removed; backticks inside the JSON
/// are left alone.
pub fn extract_json(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };

    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SAMPLE;

    #[test]
    fn test_complete_response() {
        let outcome = parse_analysis(SAMPLE).unwrap();
        assert!(outcome.is_complete());
        let result = outcome.result();
        assert_eq!(result.branding.palette, vec!["#0A2540", "#C9A43F"]);
        assert_eq!(result.information.headline, "Precision Redefined");
        assert_eq!(result.information.subheadline, "");
        assert_eq!(result.materials.repository_suggestions.len(), 1);
        assert_eq!(
            result.technical_explanation,
            "Gold-on-navy establishes premium contrast."
        );
    }

    #[test]
    fn test_empty_body_is_an_error() {
        assert!(matches!(parse_analysis(""), Err(LreError::EmptyResponse)));
        assert!(matches!(parse_analysis("  \n"), Err(LreError::EmptyResponse)));
    }

    #[test]
    fn test_empty_object_is_an_error() {
        assert!(matches!(
            parse_analysis("{}"),
            Err(LreError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_analysis("[1, 2]"),
            Err(LreError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(parse_analysis("not json"), Err(LreError::Json(_))));
    }

    #[test]
    fn test_wrong_field_type_is_an_error() {
        let text = r##"{"branding":{"paleta":"#fff","tipografia":"","efeitos":[]}}"##;
        assert!(matches!(parse_analysis(text), Err(LreError::Json(_))));
    }

    #[test]
    fn test_partial_response_lists_missing_fields() {
        let text = r##"{
            "branding": {"paleta": ["#000000"], "tipografia": "Serif"},
            "informacoes": {"headline": "Hi", "subheadline": null, "cta": "Go", "outrosTextos": []},
            "explicacao_tecnica": "ok"
        }"##;
        let outcome = parse_analysis(text).unwrap();
        assert!(!outcome.is_complete());
        assert_eq!(
            outcome.missing(),
            &[
                "branding.efeitos".to_string(),
                "elementos".to_string(),
                "informacoes.subheadline".to_string(),
                "diagramacao".to_string(),
                "materiais".to_string(),
            ]
        );

        let result = outcome.result();
        assert_eq!(result.branding.palette, vec!["#000000"]);
        assert!(result.branding.effects.is_empty());
        assert!(result.elements.central_objects.is_empty());
        assert_eq!(result.information.subheadline, "");
        assert_eq!(result.information.cta, "Go");
    }

    #[test]
    fn test_fenced_response() {
        let fenced = format!("```json\n{}\n```", SAMPLE);
        assert!(parse_analysis(&fenced).unwrap().is_complete());
    }

    #[test]
    fn test_backticks_inside_values_are_kept() {
        let text = SAMPLE.replace(
            r#""outrosTextos":[]"#,
            r#""outrosTextos":["use ```code``` here"]"#,
        );
        let outcome = parse_analysis(&text).unwrap();
        assert!(outcome.is_complete());
        assert_eq!(
            outcome.result().information.other_texts,
            vec!["use ```code``` here"]
        );

        let fenced = format!("```json\n{}\n```", text);
        let outcome = parse_analysis(&fenced).unwrap();
        assert_eq!(
            outcome.result().information.other_texts,
            vec!["use ```code``` here"]
        );
    }

    #[test]
    fn test_extract_json_plain() {
        assert_eq!(extract_json("  {\"a\": 1}\n"), "{\"a\": 1}");
        assert_eq!(extract_json("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = parse_analysis(SAMPLE).unwrap();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "complete");
        assert_eq!(value["result"]["informacoes"]["cta"], "Book a demo");
    }
}
