use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{photo, photographer};
use crate::error::AppError;
use crate::utils::linkage::LinkFields;

use super::shared::{validate_dimension, validate_http_url, validate_text};

const AVG_COLOR_MAX: usize = 20;
const PHOTOGRAPHER_NAME_MAX: usize = 255;

/// Request body for creating a photo.
///
/// Exactly one way of naming the photographer is expected: an existing
/// `photographer` id, or both `new_photographer_name` and `new_photographer_url`.
/// Read-only fields (`id`, `owner`, timestamps) are ignored if sent.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePhotoRequest {
    #[schema(example = 1920)]
    pub width: i32,
    #[schema(example = 1080)]
    pub height: i32,
    #[schema(example = "https://www.pexels.com/photo/21751820/")]
    pub url: String,
    /// Existing photographer id.
    pub photographer: Option<Uuid>,
    #[schema(example = "#7A6F5D")]
    pub avg_color: String,
    pub src_original: String,
    pub src_large2x: String,
    pub src_large: String,
    pub src_medium: String,
    pub src_small: String,
    pub src_portrait: String,
    pub src_landscape: String,
    pub src_tiny: String,
    #[schema(example = "Sunset at the beach")]
    pub alt: String,
    /// Name of a photographer to reuse or create (write-only).
    #[schema(example = "Jane Doe")]
    pub new_photographer_name: Option<String>,
    /// Profile URL of a photographer to reuse or create (write-only).
    #[schema(example = "https://www.pexels.com/@jane")]
    pub new_photographer_url: Option<String>,
}

impl CreatePhotoRequest {
    pub fn link_fields(&self) -> LinkFields<'_> {
        LinkFields {
            photographer: self.photographer,
            new_name: self.new_photographer_name.as_deref(),
            new_url: self.new_photographer_url.as_deref(),
        }
    }

    fn sources(&self) -> [(&'static str, &str); 9] {
        [
            ("url", self.url.as_str()),
            ("src_original", self.src_original.as_str()),
            ("src_large2x", self.src_large2x.as_str()),
            ("src_large", self.src_large.as_str()),
            ("src_medium", self.src_medium.as_str()),
            ("src_small", self.src_small.as_str()),
            ("src_portrait", self.src_portrait.as_str()),
            ("src_landscape", self.src_landscape.as_str()),
            ("src_tiny", self.src_tiny.as_str()),
        ]
    }
}

/// Request body for a partial photo update. Absent fields are left unchanged.
///
/// `photographer` is accepted but ignored: the photographer of an existing photo
/// can only change through `new_photographer_name` + `new_photographer_url`.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdatePhotoRequest {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub url: Option<String>,
    pub photographer: Option<Uuid>,
    pub avg_color: Option<String>,
    pub src_original: Option<String>,
    pub src_large2x: Option<String>,
    pub src_large: Option<String>,
    pub src_medium: Option<String>,
    pub src_small: Option<String>,
    pub src_portrait: Option<String>,
    pub src_landscape: Option<String>,
    pub src_tiny: Option<String>,
    pub alt: Option<String>,
    pub new_photographer_name: Option<String>,
    pub new_photographer_url: Option<String>,
}

impl UpdatePhotoRequest {
    pub fn link_fields(&self) -> LinkFields<'_> {
        LinkFields {
            photographer: self.photographer,
            new_name: self.new_photographer_name.as_deref(),
            new_url: self.new_photographer_url.as_deref(),
        }
    }

    fn sources(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("url", self.url.as_deref()),
            ("src_original", self.src_original.as_deref()),
            ("src_large2x", self.src_large2x.as_deref()),
            ("src_large", self.src_large.as_deref()),
            ("src_medium", self.src_medium.as_deref()),
            ("src_small", self.src_small.as_deref()),
            ("src_portrait", self.src_portrait.as_deref()),
            ("src_landscape", self.src_landscape.as_deref()),
            ("src_tiny", self.src_tiny.as_deref()),
        ]
    }
}

fn validate_alt(alt: &str) -> Result<(), AppError> {
    if alt.trim().is_empty() {
        return Err(AppError::Validation("alt must not be blank".into()));
    }
    Ok(())
}

fn validate_new_photographer(name: Option<&str>, url: Option<&str>) -> Result<(), AppError> {
    if let Some(name) = name {
        validate_text("new_photographer_name", name, PHOTOGRAPHER_NAME_MAX)?;
    }
    if let Some(url) = url {
        validate_http_url("new_photographer_url", url)?;
    }
    Ok(())
}

pub fn validate_create_photo(payload: &CreatePhotoRequest) -> Result<(), AppError> {
    validate_dimension("width", payload.width)?;
    validate_dimension("height", payload.height)?;
    validate_text("avg_color", &payload.avg_color, AVG_COLOR_MAX)?;
    for (field, value) in payload.sources() {
        validate_http_url(field, value)?;
    }
    validate_alt(&payload.alt)?;
    validate_new_photographer(
        payload.new_photographer_name.as_deref(),
        payload.new_photographer_url.as_deref(),
    )
}

pub fn validate_update_photo(payload: &UpdatePhotoRequest) -> Result<(), AppError> {
    if let Some(width) = payload.width {
        validate_dimension("width", width)?;
    }
    if let Some(height) = payload.height {
        validate_dimension("height", height)?;
    }
    if let Some(ref color) = payload.avg_color {
        validate_text("avg_color", color, AVG_COLOR_MAX)?;
    }
    for (field, value) in payload.sources() {
        if let Some(value) = value {
            validate_http_url(field, value)?;
        }
    }
    if let Some(ref alt) = payload.alt {
        validate_alt(alt)?;
    }
    validate_new_photographer(
        payload.new_photographer_name.as_deref(),
        payload.new_photographer_url.as_deref(),
    )
}

/// Photo as returned by the API.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub width: i32,
    pub height: i32,
    pub url: String,
    /// Photographer id.
    pub photographer: Uuid,
    pub avg_color: String,
    pub src_original: String,
    pub src_large2x: String,
    pub src_large: String,
    pub src_medium: String,
    pub src_small: String,
    pub src_portrait: String,
    pub src_landscape: String,
    pub src_tiny: String,
    pub alt: String,
    /// Owning user id, `null` for seeded photos.
    pub owner: Option<Uuid>,
    pub photographer_name: String,
    pub photographer_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PhotoResponse {
    pub fn new(m: photo::Model, photographer: &photographer::Model) -> Self {
        Self {
            id: m.id,
            width: m.width,
            height: m.height,
            url: m.url,
            photographer: m.photographer_id,
            avg_color: m.avg_color,
            src_original: m.src_original,
            src_large2x: m.src_large2x,
            src_large: m.src_large,
            src_medium: m.src_medium,
            src_small: m.src_small,
            src_portrait: m.src_portrait,
            src_landscape: m.src_landscape,
            src_tiny: m.src_tiny,
            alt: m.alt,
            owner: m.owner_id,
            photographer_name: photographer.name.clone(),
            photographer_url: photographer.url.clone(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Paginated photo list.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PhotoListResponse {
    /// Total number of matching photos across all pages.
    #[schema(example = 25)]
    pub count: u64,
    /// Link to the next page, `null` on the last page.
    #[schema(example = "/api/v1/photos/?page=2")]
    pub next: Option<String>,
    /// Link to the previous page, `null` on the first page.
    pub previous: Option<String>,
    pub results: Vec<PhotoResponse>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhotoListQuery {
    /// Page number (1-based, 20 photos per page).
    pub page: Option<u64>,
    /// Case-insensitive substring match on alt text or photographer name.
    pub search: Option<String>,
    /// Exact photographer id.
    pub photographer: Option<Uuid>,
    /// Exact average colour, e.g. `#222222`.
    pub avg_color: Option<String>,
    /// Exact owner id.
    pub owner: Option<Uuid>,
    /// One of `created_at`, `width`, `height`; prefix with `-` for descending.
    pub ordering: Option<String>,
}
