//! Result presentation.
//!
//! Projects an analysis outcome into the view model shared by the web
//! templates and the terminal output. Nothing here changes analysis values:
//! each tab is a fixed selection of fields, with empty strings and empty lists
//! left out.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::analysis::model::AnalysisResult;
use crate::analysis::AnalysisOutcome;

/// Shown before any analysis exists.
pub const PLACEHOLDER: &str =
    "Aguardando input de imagem para iniciar a engenharia reversa do layout.";

/// Title of the technical explanation footer.
pub const EXPLANATION_TITLE: &str = "Análise Técnica do Design";

/// Result tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "&'static str")]
pub enum Tab {
    #[default]
    Branding,
    Elements,
    Information,
    Layout,
    Materials,
    Json,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Branding,
        Tab::Elements,
        Tab::Information,
        Tab::Layout,
        Tab::Materials,
        Tab::Json,
    ];

    /// Identifier used in URLs and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Tab::Branding => "branding",
            Tab::Elements => "elementos",
            Tab::Information => "informacoes",
            Tab::Layout => "diagramacao",
            Tab::Materials => "materiais",
            Tab::Json => "json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Branding => "Branding",
            Tab::Elements => "Elementos",
            Tab::Information => "Informações",
            Tab::Layout => "Diagramação",
            Tab::Materials => "Materiais",
            Tab::Json => "JSON Raw",
        }
    }

    /// Parse an optional tab id, falling back to the default tab.
    pub fn from_query(id: Option<&str>) -> Self {
        id.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|t| t.id() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown tab: {}", s))
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl From<Tab> for &'static str {
    fn from(tab: Tab) -> Self {
        tab.id()
    }
}

/// How a block is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Color swatches paired with their code.
    Swatches,
    /// A paragraph under a section title.
    Prose,
    /// A label/value row.
    Row,
    /// Check-marked list.
    Checklist,
    /// Dot-bulleted list.
    Bullets,
    /// Quoted snippets.
    Quotes,
    /// Monospace position entries.
    Positions,
    /// Repository file paths.
    Files,
    /// Preformatted code.
    Code,
}

/// A color code and the CSS value safe to put in a `style` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Swatch {
    pub code: String,
    pub css: String,
}

impl Swatch {
    pub fn new(code: &str) -> Self {
        let css = if is_hex_color(code.trim()) {
            code.trim().to_string()
        } else {
            "transparent".to_string()
        };
        Self {
            code: code.to_string(),
            css,
        }
    }
}

/// One titled piece of a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    pub title: String,
    /// Prose, row value or code.
    pub text: String,
    /// List entries.
    pub items: Vec<String>,
    pub swatches: Vec<Swatch>,
}

impl Block {
    fn text(kind: BlockKind, title: &str, text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            title: title.to_string(),
            text: text.to_string(),
            items: Vec::new(),
            swatches: Vec::new(),
        })
    }

    fn list(kind: BlockKind, title: &str, items: &[String]) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            title: title.to_string(),
            text: String::new(),
            items: items.to_vec(),
            swatches: Vec::new(),
        })
    }

    fn swatches(title: &str, colors: &[String]) -> Option<Self> {
        let mut block = Self::list(BlockKind::Swatches, title, colors)?;
        block.swatches = colors.iter().map(|c| Swatch::new(c)).collect();
        Some(block)
    }

    /// Kind as a plain string, for templates.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            BlockKind::Swatches => "swatches",
            BlockKind::Prose => "prose",
            BlockKind::Row => "row",
            BlockKind::Checklist => "checklist",
            BlockKind::Bullets => "bullets",
            BlockKind::Quotes => "quotes",
            BlockKind::Positions => "positions",
            BlockKind::Files => "files",
            BlockKind::Code => "code",
        }
    }

    pub fn is_list(&self) -> bool {
        !self.items.is_empty() && self.kind != BlockKind::Swatches
    }
}

/// Tab link with its active flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabLink {
    pub id: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Everything needed to draw a result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResultView {
    pub tabs: Vec<TabLink>,
    pub active: Tab,
    pub blocks: Vec<Block>,
    pub explanation: String,
    /// Fields the service left out, for partial outcomes.
    pub missing: Vec<String>,
}

/// What the result area shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Presentation {
    Placeholder,
    Ready(ResultView),
}

/// Project the current outcome for the selected tab.
pub fn present(outcome: Option<&AnalysisOutcome>, tab: Tab) -> Presentation {
    let Some(outcome) = outcome else {
        return Presentation::Placeholder;
    };
    let result = outcome.result();

    Presentation::Ready(ResultView {
        tabs: Tab::ALL
            .into_iter()
            .map(|t| TabLink {
                id: t.id(),
                label: t.label(),
                active: t == tab,
            })
            .collect(),
        active: tab,
        blocks: blocks_for(result, tab),
        explanation: result.technical_explanation.clone(),
        missing: outcome.missing().to_vec(),
    })
}

/// The blocks of one tab.
pub fn blocks_for(result: &AnalysisResult, tab: Tab) -> Vec<Block> {
    let blocks = match tab {
        Tab::Branding => vec![
            Block::swatches("Paleta de Cores", &result.branding.palette),
            Block::text(BlockKind::Prose, "Tipografia", &result.branding.typography),
            Block::list(BlockKind::Checklist, "Efeitos Visuais", &result.branding.effects),
        ],
        Tab::Elements => vec![
            Block::list(BlockKind::Bullets, "Objetos Centrais", &result.elements.central_objects),
            Block::text(BlockKind::Prose, "Tratamento Visual", &result.elements.visual_treatment),
        ],
        Tab::Information => vec![
            Block::text(BlockKind::Row, "Headline", &result.information.headline),
            Block::text(BlockKind::Row, "Subheadline", &result.information.subheadline),
            Block::text(BlockKind::Row, "Call to Action", &result.information.cta),
            Block::list(BlockKind::Quotes, "Outros Textos", &result.information.other_texts),
        ],
        Tab::Layout => vec![
            Block::text(BlockKind::Row, "Grid Estrutural", &result.layout.grid),
            Block::text(BlockKind::Row, "Alinhamento", &result.layout.alignment),
            Block::list(
                BlockKind::Positions,
                "Posicionamento Espacial",
                &result.layout.positioning,
            ),
        ],
        Tab::Materials => vec![Block::list(
            BlockKind::Files,
            "Mapeamento de Repositório (Heverton-web/materials)",
            &result.materials.repository_suggestions,
        )],
        Tab::Json => vec![Block::text(
            BlockKind::Code,
            "JSON Estruturado Bruto",
            &result.to_pretty_json(),
        )],
    };

    blocks.into_iter().flatten().collect()
}

/// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
pub fn is_hex_color(code: &str) -> bool {
    code.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}
