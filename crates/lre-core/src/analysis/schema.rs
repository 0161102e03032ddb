//! Instruction and response schema sent with every analysis request.
//!
//! The field table below drives both the `responseSchema` the service must
//! honour and the client-side check for missing fields.

use serde_json::{json, Map, Value};

/// Instruction sent alongside the image.
pub const INSTRUCTION: &str = r##"Atue como o motor de análise do repositório layout_reverse_enginee. Sua tarefa é desestruturar artes da Conexão Implantes em dados JSON.

Regras de Extração:

Branding: Identifique os tons de azul e dourado e a tipografia Sans-Serif.

Layout: Mapeie as coordenadas (x, y) e o grid lateral (alinhamento à esquerda).

Assets: Identifique quais implantes estão na imagem e sugira o arquivo correspondente na estrutura do Heverton-web/materials.

Copy: Extraia Headline, Subheadline e CTA separadamente.

Formato de Saída (Obrigatório):
Responda apenas com o JSON estruturado para que a V1 possa interpretá-lo sem erros."##;

/// Shape of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    List,
}

/// A leaf field of the response object.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

/// A top-level object of the response.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub key: &'static str,
    pub fields: &'static [FieldSpec],
}

const fn text(key: &'static str, description: &'static str) -> FieldSpec {
    FieldSpec { key, kind: FieldKind::Text, description }
}

const fn list(key: &'static str, description: &'static str) -> FieldSpec {
    FieldSpec { key, kind: FieldKind::List, description }
}

/// Nested sections, in response order.
pub const SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        key: "branding",
        fields: &[
            list("paleta", "Códigos hexadecimais das cores"),
            text("tipografia", "Análise da tipografia"),
            list("efeitos", "Efeitos visuais aplicados"),
        ],
    },
    SectionSpec {
        key: "elementos",
        fields: &[
            list("objetosCentrais", "Objetos principais na imagem"),
            text("tratamentoVisual", "Descrição do tratamento visual (nitidez, brilho, desfoque)"),
        ],
    },
    SectionSpec {
        key: "informacoes",
        fields: &[
            text("headline", "Título principal"),
            text("subheadline", "Subtítulo"),
            text("cta", "Call to Action"),
            list("outrosTextos", "Outros textos encontrados"),
        ],
    },
    SectionSpec {
        key: "diagramacao",
        fields: &[
            text("grid", "Descrição do grid utilizado"),
            text("alinhamento", "Tipo de alinhamento predominante"),
            list("posicionamento", "Posição espacial dos elementos"),
        ],
    },
    SectionSpec {
        key: "materiais",
        fields: &[list(
            "sugestoesRepositorio",
            "Sugestões de arquivos do repositório Heverton-web/materials",
        )],
    },
];

/// The top-level free-text field.
pub const EXPLANATION: FieldSpec = text(
    "explicacao_tecnica",
    "Explicação técnica de por que o design funciona",
);

fn field_schema(field: &FieldSpec) -> Value {
    match field.kind {
        FieldKind::Text => json!({ "type": "STRING", "description": field.description }),
        FieldKind::List => json!({
            "type": "ARRAY",
            "items": { "type": "STRING" },
            "description": field.description,
        }),
    }
}

/// Build the `responseSchema`. Every top-level and nested field is required.
pub fn response_schema() -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for section in SECTIONS {
        let mut section_props = Map::new();
        for field in section.fields {
            section_props.insert(field.key.to_string(), field_schema(field));
        }
        let section_required: Vec<&str> = section.fields.iter().map(|f| f.key).collect();

        properties.insert(
            section.key.to_string(),
            json!({
                "type": "OBJECT",
                "properties": section_props,
                "required": section_required,
            }),
        );
        required.push(section.key);
    }

    properties.insert(EXPLANATION.key.to_string(), field_schema(&EXPLANATION));
    required.push(EXPLANATION.key);

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

/// Dotted paths of every required field, in response order.
pub fn required_paths() -> Vec<String> {
    let mut paths = Vec::new();
    for section in SECTIONS {
        paths.push(section.key.to_string());
        for field in section.fields {
            paths.push(format!("{}.{}", section.key, field.key));
        }
    }
    paths.push(EXPLANATION.key.to_string());
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_is_required() {
        let schema = response_schema();
        let top_required = schema["required"].as_array().unwrap();
        assert_eq!(top_required.len(), 6);

        for section in SECTIONS {
            let node = &schema["properties"][section.key];
            assert_eq!(node["type"], "OBJECT");
            let required = node["required"].as_array().unwrap();
            let props = node["properties"].as_object().unwrap();
            assert_eq!(required.len(), props.len(), "section {}", section.key);
            for key in props.keys() {
                assert!(required.iter().any(|r| r == key.as_str()));
            }
        }
    }

    #[test]
    fn test_field_shapes() {
        let schema = response_schema();
        let paleta = &schema["properties"]["branding"]["properties"]["paleta"];
        assert_eq!(paleta["type"], "ARRAY");
        assert_eq!(paleta["items"]["type"], "STRING");
        assert_eq!(paleta["description"], "Códigos hexadecimais das cores");

        let explanation = &schema["properties"]["explicacao_tecnica"];
        assert_eq!(explanation["type"], "STRING");
    }

    #[test]
    fn test_required_paths() {
        let paths = required_paths();
        assert_eq!(paths.first().map(String::as_str), Some("branding"));
        assert!(paths.contains(&"informacoes.subheadline".to_string()));
        assert!(paths.contains(&"materiais.sugestoesRepositorio".to_string()));
        assert_eq!(paths.last().map(String::as_str), Some("explicacao_tecnica"));
        // 6 top-level keys plus 13 nested fields
        assert_eq!(paths.len(), 19);
    }

    #[test]
    fn test_instruction_names_asset_repository() {
        assert!(INSTRUCTION.contains("Heverton-web/materials"));
        assert!(INSTRUCTION.contains("Headline, Subheadline e CTA"));
    }
}
