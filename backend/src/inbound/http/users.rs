//! Profile endpoints.
//!
//! ```text
//! GET  /api/user/current
//! POST /api/user/update   (multipart: assistantName, imageUrl, assistantImage)
//! ```

use actix_multipart::{Field, Multipart};
use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt as _;
use serde::{Deserialize, Serialize};
use tempfile::{NamedTempFile, TempPath};
use tokio::io::AsyncWriteExt as _;
use tracing::debug;

use crate::domain::ports::MediaUpload;
use crate::domain::{
    AssistantImage, AssistantImageSource, AssistantName, AssistantUpdateRequest, Error, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error, user_validation_error};

/// Largest accepted avatar upload.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
/// Largest accepted text field.
const MAX_TEXT_BYTES: usize = 4 * 1024;

const ASSISTANT_NAME: FieldName = FieldName::new("assistantName");
const IMAGE_URL: FieldName = FieldName::new("imageUrl");
const ASSISTANT_IMAGE: FieldName = FieldName::new("assistantImage");

/// Public profile. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_image: Option<String>,
    /// Commands in the order they were issued.
    pub history: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            assistant_name: user.assistant_name().map(ToString::to_string),
            assistant_image: user.assistant_image().map(|image| image.as_ref().to_owned()),
            history: user.history().to_vec(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/user/current",
    responses(
        (status = 200, description = "Current profile", body = UserResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/current")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let id = session.require_user_id()?;
    let user = state.accounts.current(&id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Multipart fields of `POST /api/user/update` after parsing.
///
/// The spooled file lives as long as `upload`; dropping the form deletes it.
#[derive(Default)]
struct UpdateForm {
    assistant_name: Option<String>,
    image_url: Option<String>,
    upload: Option<(TempPath, MediaUpload)>,
}

impl UpdateForm {
    async fn read(mut payload: Multipart) -> Result<Self, Error> {
        let mut form = Self::default();
        while let Some(field) = payload.try_next().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "assistantName" | "name" => {
                    form.assistant_name = non_blank(read_text(field).await?);
                }
                "imageUrl" | "Imageurl" | "assistantImageUrl" => {
                    form.image_url = non_blank(read_text(field).await?);
                }
                "assistantImage" => {
                    form.upload = spool(field).await?;
                }
                other => {
                    debug!(field = other, "ignoring unknown multipart field");
                    drain(field).await?;
                }
            }
        }
        Ok(form)
    }

    fn into_request(self) -> Result<(AssistantUpdateRequest, Option<TempPath>), Error> {
        let assistant_name = self
            .assistant_name
            .map(|name| AssistantName::new(name).map_err(|err| user_validation_error(ASSISTANT_NAME, &err)))
            .transpose()?;

        let (image, temp) = match (self.upload, self.image_url) {
            (Some((temp, upload)), _) => (Some(AssistantImageSource::Upload(upload)), Some(temp)),
            (None, Some(url)) => {
                let image = AssistantImage::new(url)
                    .map_err(|err| user_validation_error(IMAGE_URL, &err))?;
                (Some(AssistantImageSource::Url(image)), None)
            }
            (None, None) => (None, None),
        };

        Ok((
            AssistantUpdateRequest {
                assistant_name,
                image,
            },
            temp,
        ))
    }
}

fn malformed(err: actix_multipart::MultipartError) -> Error {
    Error::invalid_request(format!("Malformed multipart body: {err}"))
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

async fn read_text(mut field: Field) -> Result<String, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if bytes.len() + chunk.len() > MAX_TEXT_BYTES {
            return Err(Error::invalid_request("Text field is too long"));
        }
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes).map_err(|_| Error::invalid_request("Text field is not valid UTF-8"))
}

async fn drain(mut field: Field) -> Result<(), Error> {
    while field.try_next().await.map_err(malformed)?.is_some() {}
    Ok(())
}

/// Stream the file part into a temporary file.
///
/// Browsers send an empty part when no file was chosen; that counts as no
/// upload.
async fn spool(mut field: Field) -> Result<Option<(TempPath, MediaUpload)>, Error> {
    let file_name = field
        .content_disposition()
        .and_then(|disposition| disposition.get_filename())
        .filter(|name| !name.is_empty())
        .map(str::to_owned);
    let content_type = field.content_type().map(ToString::to_string);

    let spool_error = |err: std::io::Error| Error::internal(format!("failed to spool upload: {err}"));
    let (file, temp) = NamedTempFile::new().map_err(spool_error)?.into_parts();
    let mut file = tokio::fs::File::from_std(file);
    let mut written = 0_usize;
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        written += chunk.len();
        if written > MAX_IMAGE_BYTES {
            return Err(invalid_value_error(ASSISTANT_IMAGE, "Image is too large"));
        }
        file.write_all(&chunk).await.map_err(spool_error)?;
    }
    file.flush().await.map_err(spool_error)?;

    if written == 0 {
        return Ok(None);
    }
    let upload = MediaUpload {
        path: temp.to_path_buf(),
        file_name,
        content_type,
    };
    Ok(Some((temp, upload)))
}

/// Change the assistant's name and/or image.
#[utoipa::path(
    post,
    path = "/api/user/update",
    request_body(content_type = "multipart/form-data", description = "assistantName, imageUrl and/or an assistantImage file"),
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Nothing to update or invalid image URL", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 500, description = "Image upload failed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateAssistant"
)]
#[post("/update")]
pub async fn update_assistant(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Multipart,
) -> ApiResult<web::Json<UserResponse>> {
    let id = session.require_user_id()?;
    let form = UpdateForm::read(payload).await?;
    let (request, temp) = form.into_request()?;
    let result = state.accounts.update_assistant(&id, request).await;
    drop(temp);
    let user = result?;
    Ok(web::Json(UserResponse::from(&user)))
}
