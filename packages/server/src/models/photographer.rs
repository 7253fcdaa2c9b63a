use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::photographer;
use crate::error::AppError;

use super::shared::{validate_http_url, validate_text};

/// Request body for registering a photographer directly.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePhotographerRequest {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "https://www.pexels.com/@jane")]
    pub url: String,
}

pub fn validate_create_photographer(payload: &CreatePhotographerRequest) -> Result<(), AppError> {
    validate_text("name", &payload.name, 255)?;
    validate_http_url("url", &payload.url)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PhotographerResponse {
    pub id: Uuid,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "https://www.pexels.com/@jane")]
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<photographer::Model> for PhotographerResponse {
    fn from(m: photographer::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            url: m.url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Paginated photographer list.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PhotographerListResponse {
    #[schema(example = 3)]
    pub count: u64,
    #[schema(example = "/api/v1/photographers/?page=2")]
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<PhotographerResponse>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhotographerListQuery {
    /// Page number (1-based, 20 photographers per page).
    pub page: Option<u64>,
    /// Case-insensitive substring match on name.
    pub search: Option<String>,
    /// `name` or `created_at`; prefix with `-` for descending.
    pub ordering: Option<String>,
}
