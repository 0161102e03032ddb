//! Analysis result domain model.
//!
//! Mirrors the JSON object the analysis service is asked to produce. Wire
//! keys are the ones named in the response schema; every field defaults to
//! empty so a partial response still deserializes.

use serde::{Deserialize, Serialize};

/// Structured description of a marketing image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub branding: Branding,
    #[serde(rename = "elementos", default)]
    pub elements: Elements,
    #[serde(rename = "informacoes", default)]
    pub information: Information,
    #[serde(rename = "diagramacao", default)]
    pub layout: Layout,
    #[serde(rename = "materiais", default)]
    pub materials: Materials,
    #[serde(rename = "explicacao_tecnica", default)]
    pub technical_explanation: String,
}

/// Palette, typography and effects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Branding {
    /// Hex color codes, in the order the service listed them.
    #[serde(rename = "paleta", default)]
    pub palette: Vec<String>,
    #[serde(rename = "tipografia", default)]
    pub typography: String,
    #[serde(rename = "efeitos", default)]
    pub effects: Vec<String>,
}

/// Central subjects and their visual treatment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Elements {
    #[serde(rename = "objetosCentrais", default)]
    pub central_objects: Vec<String>,
    #[serde(rename = "tratamentoVisual", default)]
    pub visual_treatment: String,
}

/// Copy found in the image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Information {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub subheadline: String,
    #[serde(default)]
    pub cta: String,
    #[serde(rename = "outrosTextos", default)]
    pub other_texts: Vec<String>,
}

/// Grid, alignment and spatial positions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub grid: String,
    #[serde(rename = "alinhamento", default)]
    pub alignment: String,
    #[serde(rename = "posicionamento", default)]
    pub positioning: Vec<String>,
}

/// Suggested files from the asset repository.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Materials {
    #[serde(rename = "sugestoesRepositorio", default)]
    pub repository_suggestions: Vec<String>,
}

impl AnalysisResult {
    /// Canonical two-space indented JSON, field order as declared.
    pub fn to_pretty_json(&self) -> String {
        // Plain strings and lists of strings always serialize.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_keys() {
        let result = AnalysisResult {
            information: Information {
                headline: "Precision Redefined".to_string(),
                ..Default::default()
            },
            technical_explanation: "ok".to_string(),
            ..Default::default()
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["informacoes"]["headline"], "Precision Redefined");
        assert_eq!(value["explicacao_tecnica"], "ok");
        assert!(value["branding"]["paleta"].is_array());
        assert!(value["elementos"]["objetosCentrais"].is_array());
        assert!(value["materiais"]["sugestoesRepositorio"].is_array());
    }

    #[test]
    fn test_pretty_json_keeps_declared_order() {
        let json = AnalysisResult::default().to_pretty_json();
        let branding = json.find("\"branding\"").unwrap();
        let elementos = json.find("\"elementos\"").unwrap();
        let explicacao = json.find("\"explicacao_tecnica\"").unwrap();
        assert!(branding < elementos && elementos < explicacao);
        assert!(json.contains("\n  \"branding\": {\n    \"paleta\": []"));
    }
}
