use super::AppState;
use super::page::{self, Notice, PageView};
use crate::gallery::Site;
use crate::session::Session;
use axum::extract::{Form, Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub prompt: String,
    pub reset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub name: String,
}

/// Renders the page from current session state plus gallery listing.
async fn render(
    state: &AppState,
    session: &Session,
    notice: Option<Notice>,
    draft: &str,
    replay: Option<&Site>,
) -> String {
    let sites = match &state.gallery {
        Some(gallery) => gallery.list_accepted().await.unwrap_or_else(|e| {
            tracing::warn!("failed to load gallery: {}", e);
            Arc::new(Vec::new())
        }),
        None => Arc::new(Vec::new()),
    };

    page::render(&PageView {
        session,
        notice: notice.as_ref(),
        draft,
        gallery_enabled: state.gallery.is_some(),
        sites: &sites,
        replay,
    })
}

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = state.sessions.resolve(&headers);
    let session = handle.session.lock().await;
    let page = render(&state, &session, None, "", None).await;
    handle.respond(page)
}

pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<GenerateForm>,
) -> Response {
    let handle = state.sessions.resolve(&headers);
    let mut session = handle.session.lock().await;

    let reset = form.reset.is_some();
    let notice = match session
        .generate(state.provider.as_ref(), &form.prompt, reset)
        .await
    {
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(session = %handle.id, "generation failed: {}", e);
            Some(Notice::Error(e.user_message()))
        }
    };

    let page = render(&state, &session, notice, &form.prompt, None).await;
    handle.respond(page)
}

pub async fn toggle_code(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = state.sessions.resolve(&headers);
    let mut session = handle.session.lock().await;
    if session.artifact().is_some() {
        session.toggle_explanation();
    }
    let page = render(&state, &session, None, "", None).await;
    handle.respond(page)
}

pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SubmitForm>,
) -> Response {
    let handle = state.sessions.resolve(&headers);
    let session = handle.session.lock().await;

    let notice = match (&state.gallery, session.artifact()) {
        (None, _) => Notice::Error("Gallery is disabled".to_string()),
        (Some(_), None) => Notice::Error("Generate a website before publishing it".to_string()),
        (Some(gallery), Some(artifact)) => match gallery.submit(&form.name, &artifact.code).await {
            Ok(_) => Notice::Success("Your website has been submitted for review.".to_string()),
            Err(e) => {
                tracing::warn!(session = %handle.id, "submission rejected: {}", e);
                Notice::Error(e.user_message())
            }
        },
    };

    let page = render(&state, &session, Some(notice), "", None).await;
    handle.respond(page)
}

pub async fn replay(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let handle = state.sessions.resolve(&headers);
    let session = handle.session.lock().await;

    let (site, notice) = match &state.gallery {
        None => (None, Some(Notice::Error("Gallery is disabled".to_string()))),
        Some(gallery) => match gallery.get(id).await {
            Ok(Some(site)) if site.accepted => {
                if let Err(e) = gallery.record_view(id).await {
                    tracing::warn!(%id, "failed to record view: {}", e);
                }
                (Some(site), None)
            }
            Ok(_) => (None, Some(Notice::Error("Website not found".to_string()))),
            Err(e) => {
                tracing::warn!(%id, "failed to load site: {}", e);
                (None, Some(Notice::Error(e.user_message())))
            }
        },
    };

    let page = render(&state, &session, notice, "", site.as_ref()).await;
    handle.respond(page)
}
