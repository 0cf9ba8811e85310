//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the editing-session REST API and the
//! master definition for the OpenAPI specification.
//!
//! One handler per document-store operation: the console frontend opens a
//! session for a slug, syncs whole-values section edits into it, stages
//! image files, and finally asks the session to save. The session's
//! document store is the source of truth between requests.

use crate::web::state::{AppState, EditSession};
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use page_builder_core::{
    domain::{ImageRef, PendingImage, Section, SectionId, Slug, TemplateId},
    images::resolve_image_url,
    ports::PortError,
    save::{SaveError, SavePipeline},
    schema::{self, FieldError},
    store::{DocumentStore, StoreError},
    wire,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_pages_handler,
        open_session_handler,
        get_session_handler,
        close_session_handler,
        add_section_handler,
        update_section_handler,
        remove_section_handler,
        move_section_handler,
        stage_image_handler,
        clear_image_handler,
        image_preview_handler,
        save_session_handler,
    ),
    components(schemas(
        OpenSessionRequest,
        AddSectionRequest,
        MoveSectionRequest,
        DocumentView,
        SectionView,
        FieldErrorView,
        PageListView,
        PageSummaryView,
        SaveFailureBody,
    )),
    tags(
        (name = "Page Builder API", description = "Editing sessions for CMS page documents.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct OpenSessionRequest {
    /// The page slug to edit; a slug the backend does not know yet starts an
    /// empty document.
    pub slug: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddSectionRequest {
    pub template_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct MoveSectionRequest {
    pub index: usize,
}

/// One section as the editor renders it.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub id: String,
    pub template_id: String,
    /// The template-shaped values object the editor binds its form to.
    #[schema(value_type = Object)]
    pub data: Value,
    /// Where to render the image from right now: the staged preview when one
    /// exists, otherwise the persisted path resolved to an absolute URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_display_url: Option<String>,
    /// Advisory schema findings; they never block synchronization.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<FieldErrorView>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub session_id: Uuid,
    pub slug: String,
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FieldErrorView {
    pub field: String,
    pub message: String,
}

impl From<&FieldError> for FieldErrorView {
    fn from(err: &FieldError) -> Self {
        Self {
            field: err.field.clone(),
            message: err.message.clone(),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageSummaryView {
    pub slug: String,
    pub section_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct PageListView {
    pub pages: Vec<PageSummaryView>,
}

/// Body returned when a save attempt fails, naming the failing step so the
/// console can tell an upload problem from a submit problem.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveFailureBody {
    pub step: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldErrorView>,
    pub message: String,
}

//=========================================================================================
// View construction and error mapping
//=========================================================================================

fn section_view(app_state: &AppState, session_id: Uuid, section: &Section) -> SectionView {
    let (wire_section, pending) = wire::encode_for_display(section);
    let tagged = serde_json::to_value(&wire_section.body).unwrap_or(Value::Null);
    let data = tagged.get("data").cloned().unwrap_or_else(|| Value::Object(Default::default()));

    let image_display_url = if pending {
        Some(format!(
            "/editor/sessions/{session_id}/sections/{}/image/preview",
            section.id
        ))
    } else {
        section
            .body
            .image()
            .and_then(ImageRef::persisted_path)
            .map(|path| resolve_image_url(&app_state.config.upstream_public_url, path))
    };

    let validation = match schema::validate(&section.body) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(FieldErrorView::from).collect(),
    };

    SectionView {
        id: section.id.to_string(),
        template_id: section.template().as_str().to_owned(),
        data,
        image_display_url,
        validation,
    }
}

fn document_view(app_state: &AppState, session_id: Uuid, store: &DocumentStore) -> DocumentView {
    DocumentView {
        session_id,
        slug: store.slug().map(ToString::to_string).unwrap_or_default(),
        sections: store
            .sections()
            .iter()
            .map(|section| section_view(app_state, session_id, section))
            .collect(),
    }
}

fn session_not_found(session_id: Uuid) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("no edit session with id {session_id}"),
    )
}

fn store_error_response(err: StoreError) -> (StatusCode, String) {
    let status = match &err {
        StoreError::NoDocument => StatusCode::CONFLICT,
        StoreError::SectionNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::TemplateMismatch { .. } | StoreError::NoImageField(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    (status, err.to_string())
}

fn port_error_response(context: &str, err: &PortError) -> (StatusCode, String) {
    let status = match err {
        PortError::NotFound(_) => StatusCode::NOT_FOUND,
        // The upstream backend rejected or was unreachable; from the
        // console's point of view this service is a gateway to it.
        PortError::Unauthorized | PortError::Network(_) | PortError::Unexpected(_) => {
            StatusCode::BAD_GATEWAY
        }
    };
    (status, format!("{context} failed: {err}"))
}

fn save_failure_response(err: SaveError) -> Response {
    let (status, body) = match err {
        SaveError::NoDocument => (
            StatusCode::CONFLICT,
            SaveFailureBody {
                step: "document",
                section_id: None,
                errors: Vec::new(),
                message: "no document is loaded".into(),
            },
        ),
        SaveError::Validation { section, errors } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            SaveFailureBody {
                step: "validation",
                section_id: Some(section.to_string()),
                errors: errors.iter().map(FieldErrorView::from).collect(),
                message: format!("section {section} failed validation"),
            },
        ),
        SaveError::Upload { section, source } => (
            StatusCode::BAD_GATEWAY,
            SaveFailureBody {
                step: "upload",
                section_id: Some(section.to_string()),
                errors: Vec::new(),
                message: source.to_string(),
            },
        ),
        SaveError::Submit { source } => (
            StatusCode::BAD_GATEWAY,
            SaveFailureBody {
                step: "submit",
                section_id: None,
                errors: Vec::new(),
                message: source.to_string(),
            },
        ),
    };
    (status, Json(body)).into_response()
}

//=========================================================================================
// Page directory
//=========================================================================================

/// List summary metadata for every known page.
#[utoipa::path(
    get,
    path = "/pages",
    responses(
        (status = 200, description = "Known pages", body = PageListView),
        (status = 502, description = "Upstream backend unavailable")
    )
)]
pub async fn list_pages_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<PageListView>, (StatusCode, String)> {
    let summaries = app_state.pages.list_pages().await.map_err(|e| {
        error!("Failed to list pages: {e}");
        port_error_response("page list", &e)
    })?;
    Ok(Json(PageListView {
        pages: summaries
            .into_iter()
            .map(|summary| PageSummaryView {
                slug: summary.slug.to_string(),
                section_count: summary.section_count,
                updated_at: summary.updated_at,
            })
            .collect(),
    }))
}

//=========================================================================================
// Session lifecycle
//=========================================================================================

/// Open an edit session for a slug.
///
/// Fetches the persisted document (or starts an empty one for a new slug)
/// into a fresh per-session store and returns the full document view, which
/// is also the editor's one-time hydration payload.
#[utoipa::path(
    post,
    path = "/editor/sessions",
    request_body = OpenSessionRequest,
    responses(
        (status = 201, description = "Session opened", body = DocumentView),
        (status = 400, description = "Invalid slug"),
        (status = 502, description = "Document load failed")
    )
)]
pub async fn open_session_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<DocumentView>), (StatusCode, String)> {
    let slug = Slug::new(request.slug).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let mut session = EditSession::new(app_state.pages.clone());
    session.store.load(&slug).await.map_err(|e| {
        error!(slug = %slug, "Failed to load document: {e}");
        port_error_response("document load", &e)
    })?;
    session.bump_epoch();

    let (session_id, handle) = app_state.sessions.insert(session).await;
    let session = handle.lock().await;
    info!(%session_id, slug = %slug, "edit session opened");
    Ok((
        StatusCode::CREATED,
        Json(document_view(&app_state, session_id, &session.store)),
    ))
}

/// Current state of an edit session's document.
#[utoipa::path(
    get,
    path = "/editor/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "The edit session id.")),
    responses(
        (status = 200, description = "Current document", body = DocumentView),
        (status = 404, description = "No such session")
    )
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<DocumentView>, (StatusCode, String)> {
    let handle = app_state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    let session = handle.lock().await;
    Ok(Json(document_view(&app_state, session_id, &session.store)))
}

/// Close an edit session, discarding unsaved edits.
///
/// Cancels any in-flight save and resets the store so nothing from this
/// session can leak into a later one.
#[utoipa::path(
    delete,
    path = "/editor/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "The edit session id.")),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "No such session")
    )
)]
pub async fn close_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let handle = app_state
        .sessions
        .remove(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    let mut session = handle.lock().await;
    session.cancel.cancel();
    session.store.reset();
    session.bump_epoch();
    info!(%session_id, "edit session closed");
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Section mutations
//=========================================================================================

/// Append a new section with the template's default data.
#[utoipa::path(
    post,
    path = "/editor/sessions/{session_id}/sections",
    params(("session_id" = Uuid, Path, description = "The edit session id.")),
    request_body = AddSectionRequest,
    responses(
        (status = 201, description = "Section added", body = SectionView),
        (status = 400, description = "Unknown template id"),
        (status = 404, description = "No such session")
    )
)]
pub async fn add_section_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AddSectionRequest>,
) -> Result<(StatusCode, Json<SectionView>), (StatusCode, String)> {
    let template: TemplateId = request
        .template_id
        .parse()
        .map_err(|e: page_builder_core::domain::UnknownTemplate| {
            (StatusCode::BAD_REQUEST, e.to_string())
        })?;

    let handle = app_state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    let mut session = handle.lock().await;
    session.touch();
    let id = session
        .store
        .add_section(template)
        .map_err(store_error_response)?;
    let view = session
        .store
        .section(&id)
        .map(|section| section_view(&app_state, session_id, section))
        .ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "added section not found".to_string(),
        ))?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Synchronize one section's full values object into the session store.
///
/// This is the editor's sync target: the entire current values object is
/// sent on every change and replaces the section's data wholesale (last
/// write wins, routed by id). Schema findings come back as advisory
/// `validation` entries; they never block the write. The image slot is owned
/// by the staging endpoints and is carried over untouched.
#[utoipa::path(
    put,
    path = "/editor/sessions/{session_id}/sections/{section_id}",
    params(
        ("session_id" = Uuid, Path, description = "The edit session id."),
        ("section_id" = String, Path, description = "The section id.")
    ),
    responses(
        (status = 200, description = "Values synchronized", body = SectionView),
        (status = 400, description = "Values do not match the section's template"),
        (status = 404, description = "No such session or section")
    )
)]
pub async fn update_section_handler(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, section_id)): Path<(Uuid, String)>,
    Json(values): Json<Value>,
) -> Result<Json<SectionView>, (StatusCode, String)> {
    let section_id = SectionId::new(section_id);
    let handle = app_state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    let mut session = handle.lock().await;
    session.touch();

    let (template, current_image) = {
        let section = session
            .store
            .section(&section_id)
            .ok_or_else(|| store_error_response(StoreError::SectionNotFound(section_id.clone())))?;
        (section.template(), section.body.image().cloned())
    };

    let mut body = wire::body_from_template_value(template, values)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid values for {template}: {e}")))?;
    if let (Some(slot), Some(current)) = (body.image_mut(), current_image) {
        *slot = current;
    }

    session
        .store
        .replace_section_data(&section_id, body)
        .map_err(store_error_response)?;

    let view = session
        .store
        .section(&section_id)
        .map(|section| section_view(&app_state, session_id, section))
        .ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "synced section not found".to_string(),
        ))?;
    Ok(Json(view))
}

/// Remove a section from the document.
#[utoipa::path(
    delete,
    path = "/editor/sessions/{session_id}/sections/{section_id}",
    params(
        ("session_id" = Uuid, Path, description = "The edit session id."),
        ("section_id" = String, Path, description = "The section id.")
    ),
    responses(
        (status = 204, description = "Section removed"),
        (status = 404, description = "No such session or section")
    )
)]
pub async fn remove_section_handler(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, section_id)): Path<(Uuid, String)>,
) -> Result<StatusCode, (StatusCode, String)> {
    let handle = app_state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    let mut session = handle.lock().await;
    session.touch();
    session
        .store
        .remove_section(&SectionId::new(section_id))
        .map_err(store_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a section to a new position in the display order.
#[utoipa::path(
    put,
    path = "/editor/sessions/{session_id}/sections/{section_id}/position",
    params(
        ("session_id" = Uuid, Path, description = "The edit session id."),
        ("section_id" = String, Path, description = "The section id.")
    ),
    request_body = MoveSectionRequest,
    responses(
        (status = 200, description = "New document order", body = DocumentView),
        (status = 404, description = "No such session or section")
    )
)]
pub async fn move_section_handler(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, section_id)): Path<(Uuid, String)>,
    Json(request): Json<MoveSectionRequest>,
) -> Result<Json<DocumentView>, (StatusCode, String)> {
    let handle = app_state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    let mut session = handle.lock().await;
    session.touch();
    session
        .store
        .move_section(&SectionId::new(section_id), request.index)
        .map_err(store_error_response)?;
    Ok(Json(document_view(&app_state, session_id, &session.store)))
}

//=========================================================================================
// Image staging
//=========================================================================================

/// Stage an image file for a section.
///
/// Accepts a multipart/form-data request with a single file part. The file
/// is held in session memory and uploaded to the backend only when the
/// session saves; discarding the session never leaves an orphaned upload.
#[utoipa::path(
    post,
    path = "/editor/sessions/{session_id}/sections/{section_id}/image",
    params(
        ("session_id" = Uuid, Path, description = "The edit session id."),
        ("section_id" = String, Path, description = "The section id.")
    ),
    request_body(content_type = "multipart/form-data", description = "The image file to stage."),
    responses(
        (status = 200, description = "Image staged", body = SectionView),
        (status = 400, description = "Missing or malformed file part"),
        (status = 404, description = "No such session or section"),
        (status = 415, description = "Not an image"),
        (status = 422, description = "Section's template has no image field")
    )
)]
pub async fn stage_image_handler(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, section_id)): Path<(Uuid, String)>,
    mut multipart: Multipart,
) -> Result<Json<SectionView>, (StatusCode, String)> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read multipart data: {e}"),
            )
        })?
        .ok_or((
            StatusCode::BAD_REQUEST,
            "Multipart form must include a file".to_string(),
        ))?;

    let file_name = field.file_name().unwrap_or("upload.bin").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    if !content_type.starts_with("image/") {
        return Err((
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("expected an image file, got {content_type}"),
        ));
    }
    let data = field.bytes().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read file bytes: {e}"),
        )
    })?;

    let section_id = SectionId::new(section_id);
    let handle = app_state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    let mut session = handle.lock().await;
    session.touch();
    session
        .store
        .stage_image(
            &section_id,
            PendingImage {
                file_name,
                content_type,
                bytes: data,
            },
        )
        .map_err(store_error_response)?;

    let view = session
        .store
        .section(&section_id)
        .map(|section| section_view(&app_state, session_id, section))
        .ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "staged section not found".to_string(),
        ))?;
    Ok(Json(view))
}

/// Clear a section's image slot, discarding a staged file or detaching the
/// persisted image.
#[utoipa::path(
    delete,
    path = "/editor/sessions/{session_id}/sections/{section_id}/image",
    params(
        ("session_id" = Uuid, Path, description = "The edit session id."),
        ("section_id" = String, Path, description = "The section id.")
    ),
    responses(
        (status = 200, description = "Image cleared", body = SectionView),
        (status = 404, description = "No such session or section"),
        (status = 422, description = "Section's template has no image field")
    )
)]
pub async fn clear_image_handler(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, section_id)): Path<(Uuid, String)>,
) -> Result<Json<SectionView>, (StatusCode, String)> {
    let section_id = SectionId::new(section_id);
    let handle = app_state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    let mut session = handle.lock().await;
    session.touch();
    session
        .store
        .clear_image(&section_id)
        .map_err(store_error_response)?;
    let view = session
        .store
        .section(&section_id)
        .map(|section| section_view(&app_state, session_id, section))
        .ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "cleared section not found".to_string(),
        ))?;
    Ok(Json(view))
}

/// Serve a staged image's bytes for preview display.
#[utoipa::path(
    get,
    path = "/editor/sessions/{session_id}/sections/{section_id}/image/preview",
    params(
        ("session_id" = Uuid, Path, description = "The edit session id."),
        ("section_id" = String, Path, description = "The section id.")
    ),
    responses(
        (status = 200, description = "The staged image bytes"),
        (status = 404, description = "No staged image for this section")
    )
)]
pub async fn image_preview_handler(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, section_id)): Path<(Uuid, String)>,
) -> Result<Response, (StatusCode, String)> {
    let handle = app_state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    let session = handle.lock().await;
    let pending = session
        .store
        .section(&SectionId::new(section_id))
        .and_then(|section| section.body.image())
        .and_then(ImageRef::pending)
        .ok_or((
            StatusCode::NOT_FOUND,
            "no staged image for this section".to_string(),
        ))?;
    Ok((
        [(header::CONTENT_TYPE, pending.content_type.clone())],
        pending.bytes.clone(),
    )
        .into_response())
}

//=========================================================================================
// Save
//=========================================================================================

/// Save the session's document to the backend.
///
/// Runs the save pipeline (validate, resolve staged images, submit as one
/// whole-document replace) against a snapshot, so a failed save leaves the
/// session's document exactly as the user left it. The result is committed
/// only if the session still has the same document identity it had when the
/// save started; otherwise it is discarded.
#[utoipa::path(
    post,
    path = "/editor/sessions/{session_id}/save",
    params(("session_id" = Uuid, Path, description = "The edit session id.")),
    responses(
        (status = 200, description = "Saved; canonical document reloaded", body = DocumentView),
        (status = 404, description = "No such session"),
        (status = 409, description = "Session was closed or reloaded while saving", body = SaveFailureBody),
        (status = 422, description = "A section failed validation", body = SaveFailureBody),
        (status = 502, description = "Upload or submit failed", body = SaveFailureBody)
    )
)]
pub async fn save_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Response {
    let Some(handle) = app_state.sessions.get(session_id).await else {
        let (status, message) = session_not_found(session_id);
        return (status, message).into_response();
    };

    // Snapshot under the session lock, resolve outside it: uploads must not
    // block other edits, and a slow backend must not wedge the session.
    let (snapshot, epoch, cancel) = {
        let mut session = handle.lock().await;
        session.touch();
        (
            session.store.snapshot(),
            session.epoch,
            session.cancel.clone(),
        )
    };

    let pipeline = SavePipeline::new(app_state.images.clone(), app_state.pages.clone());
    let outcome = tokio::select! {
        () = cancel.cancelled() => {
            info!(%session_id, "save aborted: session closed");
            return stale_save_response("session was closed while saving");
        }
        outcome = pipeline.save(snapshot) => outcome,
    };

    match outcome {
        Ok(payload) => {
            let mut session = handle.lock().await;
            if session.epoch != epoch {
                warn!(%session_id, "discarding save result for a superseded document");
                return stale_save_response("document changed while saving");
            }
            // Reload canonical persisted state rather than trusting the
            // optimistic local copy.
            if let Err(e) = session.store.load(&payload.slug).await {
                error!(%session_id, "reload after save failed: {e}");
                let (status, message) = port_error_response("reload after save", &e);
                return (status, message).into_response();
            }
            session.bump_epoch();
            info!(%session_id, slug = %payload.slug, sections = payload.sections.len(), "document saved");
            Json(document_view(&app_state, session_id, &session.store)).into_response()
        }
        Err(err) => {
            warn!(%session_id, "save failed: {err}");
            save_failure_response(err)
        }
    }
}

fn stale_save_response(message: &str) -> Response {
    (
        StatusCode::CONFLICT,
        Json(SaveFailureBody {
            step: "session",
            section_id: None,
            errors: Vec::new(),
            message: message.to_owned(),
        }),
    )
        .into_response()
}
