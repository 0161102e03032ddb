//! HTMX-driven page route handlers.
//!
//! `GET /` renders the full page; the other routes return the fragments HTMX
//! swaps in after an upload, a tab switch or a clear.

use askama::Template;
use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::warn;

use crate::state::AppState;
use lre_core::ingest::{media_type_from_path, UploadedImage};
use lre_core::presenter::{self, Presentation, ResultView, Tab};
use lre_core::session::{Completion, Session};

/// Generic notice shown when the analysis service fails.
pub const ANALYSIS_FAILED_NOTICE: &str =
    "Ocorreu um erro ao analisar a imagem. Verifique o log do servidor para mais detalhes.";

/// Notice shown for non-image uploads.
pub const NOT_AN_IMAGE_NOTICE: &str = "Por favor, envie apenas imagens.";

// ============================================================
// TEMPLATES
// ============================================================

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    page: PageView,
}

#[derive(Template)]
#[template(path = "partials/workspace.html")]
struct WorkspaceTemplate {
    page: PageView,
}

#[derive(Template)]
#[template(path = "partials/results.html")]
struct ResultsTemplate {
    page: PageView,
}

#[derive(Template)]
#[template(path = "partials/uploader.html")]
struct UploaderTemplate {
    page: PageView,
}

/// View model for the whole page; partials read the parts they need.
struct PageView {
    busy: bool,
    status_label: &'static str,
    has_preview: bool,
    preview_url: String,
    notice: String,
    has_result: bool,
    view: ResultView,
    placeholder: &'static str,
    explanation_title: &'static str,
}

impl PageView {
    fn from_session(session: &Session, tab: Tab) -> Self {
        let (has_result, view) = match presenter::present(session.outcome(), tab) {
            Presentation::Ready(view) => (true, view),
            Presentation::Placeholder => (false, ResultView::default()),
        };
        let busy = session.is_busy();

        Self {
            busy,
            status_label: if busy { "PROCESSANDO..." } else { "SISTEMA PRONTO" },
            has_preview: session.image().is_some(),
            preview_url: session
                .image()
                .map(|i| i.preview_url.clone())
                .unwrap_or_default(),
            notice: String::new(),
            has_result,
            view,
            placeholder: presenter::PLACEHOLDER,
            explanation_title: presenter::EXPLANATION_TITLE,
        }
    }

    fn with_notice(mut self, notice: &str) -> Self {
        self.notice = notice.to_string();
        self
    }
}

// ============================================================
// REQUEST TYPES
// ============================================================

#[derive(Deserialize)]
pub struct TabQuery {
    pub tab: Option<String>,
}

impl TabQuery {
    fn tab(&self) -> Tab {
        Tab::from_query(self.tab.as_deref())
    }
}

// ============================================================
// HANDLERS
// ============================================================

/// GET / - Render the full page.
pub async fn index(State(state): State<AppState>, Query(query): Query<TabQuery>) -> Response {
    let page = {
        let session = state.session.read().await;
        PageView::from_session(&session, query.tab())
    };
    render(IndexTemplate { page }, StatusCode::OK)
}

/// GET /results - Render the result area for a tab.
pub async fn results(State(state): State<AppState>, Query(query): Query<TabQuery>) -> Response {
    let page = {
        let session = state.session.read().await;
        PageView::from_session(&session, query.tab())
    };
    render(ResultsTemplate { page }, StatusCode::OK)
}

/// POST /analyze - Accept an uploaded image, analyze it and return the
/// workspace (preview + results).
pub async fn analyze(State(state): State<AppState>, multipart: Multipart) -> Response {
    let image = match read_image_field(multipart).await {
        Ok(image) => image,
        Err((status, notice)) => {
            let page = {
                let session = state.session.read().await;
                PageView::from_session(&session, Tab::default()).with_notice(&notice)
            };
            return render(WorkspaceTemplate { page }, status);
        }
    };

    let run = state.run_analysis(image).await;

    let session = state.session.read().await;
    let page = PageView::from_session(&session, Tab::default());
    let page = match run.completion {
        Completion::Failed(_) | Completion::Stale { error: Some(_) } => {
            page.with_notice(ANALYSIS_FAILED_NOTICE)
        }
        Completion::Applied | Completion::Stale { error: None } => page,
    };
    render(WorkspaceTemplate { page }, StatusCode::OK)
}

/// POST /clear - Remove the preview and return an empty uploader.
pub async fn clear(State(state): State<AppState>) -> Response {
    state.clear_image().await;
    let page = {
        let session = state.session.read().await;
        PageView::from_session(&session, Tab::default())
    };
    render(UploaderTemplate { page }, StatusCode::OK)
}

// ============================================================
// HELPERS
// ============================================================

/// Pull the `image` field out of the form and validate it.
async fn read_image_field(mut multipart: Multipart) -> Result<UploadedImage, (StatusCode, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Upload inválido: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let declared = field
            .content_type()
            .map(str::to_string)
            .filter(|m| !m.is_empty() && m != "application/octet-stream");
        let mime_type = match (declared, file_name.as_deref()) {
            (Some(m), _) => m,
            (None, Some(name)) => media_type_from_path(std::path::Path::new(name))
                .map(str::to_string)
                .unwrap_or_default(),
            (None, None) => String::new(),
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Upload inválido: {}", e)))?;

        return UploadedImage::from_bytes(&bytes, &mime_type).map_err(|e| {
            warn!(file = ?file_name, error = %e, "Rejected upload");
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, NOT_AN_IMAGE_NOTICE.to_string())
        });
    }

    Err((StatusCode::BAD_REQUEST, "Nenhuma imagem enviada.".to_string()))
}

fn render<T: Template>(template: T, status: StatusCode) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("Template error: {}", e))).into_response(),
    }
}
