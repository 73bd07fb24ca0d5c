//! REST handlers for automations.
//!
//! Create and update take a multipart body: an `automation` part holding the
//! JSON fields and an optional `imageFile` part holding the upload.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use autohub_app::ports::{AutomationRepository, BlobStore, EventPublisher};
use autohub_domain::automation::{Automation, AutomationInput};
use autohub_domain::id::AutomationId;
use autohub_domain::image::ImageUpload;

use crate::error::ApiError;
use crate::state::AppState;

const AUTOMATION_PART: &str = "automation";
const IMAGE_PART: &str = "imageFile";

/// JSON fields of the `automation` part.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationForm {
    #[serde(default)]
    pub id: Option<AutomationId>,
    pub name: String,
    /// Accepted for compatibility; the server owns positions.
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub remove_image: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Automation>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<Automation>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Automation>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Possible responses from the swap endpoint.
pub enum SwapResponse {
    Ok,
}

impl IntoResponse for SwapResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok => StatusCode::OK.into_response(),
        }
    }
}

/// `GET /api/automations` — list all automations in display order.
pub async fn list<R, P, B>(
    State(state): State<AppState<R, P, B>>,
) -> Result<ListResponse, ApiError>
where
    R: AutomationRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let automations = state.automation_service.list_automations().await?;
    Ok(ListResponse::Ok(Json(automations)))
}

/// `GET /api/automations/{id}` — get automation by ID.
pub async fn get<R, P, B>(
    State(state): State<AppState<R, P, B>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: AutomationRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let id = AutomationId::parse(&id)?;
    let automation = state.automation_service.get_automation(id).await?;
    Ok(GetResponse::Ok(Json(automation)))
}

/// `POST /api/automations` — create a new automation.
pub async fn create<R, P, B>(
    State(state): State<AppState<R, P, B>>,
    multipart: Multipart,
) -> Result<CreateResponse, ApiError>
where
    R: AutomationRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let input = read_input(multipart).await?;
    let automation = state.automation_service.create_automation(input).await?;
    Ok(CreateResponse::Created(Json(automation)))
}

/// `PATCH /api/automations` — update the automation named by the `id` field.
pub async fn update<R, P, B>(
    State(state): State<AppState<R, P, B>>,
    multipart: Multipart,
) -> Result<GetResponse, ApiError>
where
    R: AutomationRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let input = read_input(multipart).await?;
    let automation = state.automation_service.update_automation(input).await?;
    Ok(GetResponse::Ok(Json(automation)))
}

/// `DELETE /api/automations/{id}` — delete an automation.
pub async fn delete<R, P, B>(
    State(state): State<AppState<R, P, B>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    R: AutomationRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let id = AutomationId::parse(&id)?;
    state.automation_service.delete_automation(id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/automations/{id1}/swap/{id2}` — exchange two positions.
pub async fn swap<R, P, B>(
    State(state): State<AppState<R, P, B>>,
    Path((first, second)): Path<(String, String)>,
) -> Result<SwapResponse, ApiError>
where
    R: AutomationRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let first = AutomationId::parse(&first)?;
    let second = AutomationId::parse(&second)?;
    state.automation_service.swap_order(first, second).await?;
    Ok(SwapResponse::Ok)
}

async fn read_input(mut multipart: Multipart) -> Result<AutomationInput, ApiError> {
    let mut form: Option<AutomationForm> = None;
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(AUTOMATION_PART) => {
                let bytes = field.bytes().await?;
                let parsed = serde_json::from_slice(&bytes).map_err(|err| {
                    ApiError::BadRequest(format!("invalid `{AUTOMATION_PART}` part: {err}"))
                })?;
                form = Some(parsed);
            }
            Some(IMAGE_PART) => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await?;
                // browsers send an empty part when no file was picked
                if !file_name.is_empty() {
                    upload = Some(ImageUpload::new(file_name, content.to_vec()));
                }
            }
            _ => {}
        }
    }

    let form = form
        .ok_or_else(|| ApiError::BadRequest(format!("missing `{AUTOMATION_PART}` part")))?;

    Ok(AutomationInput {
        id: form.id,
        name: form.name,
        position: form.position,
        image_upload: upload,
        remove_image: form.remove_image,
    })
}
