use axum::Json;
use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{photo, photographer};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::extractors::query::AppQuery;
use crate::models::photographer::*;
use crate::models::shared::{PAGE_SIZE, PageWindow, like_pattern, parse_ordering};
use crate::state::AppState;
use crate::utils::linkage;

const ORDERING_FIELDS: &[(&str, photographer::Column)] = &[
    ("name", photographer::Column::Name),
    ("created_at", photographer::Column::CreatedAt),
];

#[utoipa::path(
    get,
    path = "/photographers/",
    tag = "Photographers",
    operation_id = "listPhotographers",
    summary = "List photographers",
    description = "Public. Search matches the name (case-insensitive). 20 photographers per page.",
    params(PhotographerListQuery),
    responses(
        (status = 200, description = "Page of photographers", body = PhotographerListResponse),
        (status = 400, description = "Invalid ordering (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Page out of range (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, uri, query))]
pub async fn list_photographers(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    AppQuery(query): AppQuery<PhotographerListQuery>,
) -> Result<Json<PhotographerListResponse>, AppError> {
    let (sort_column, sort_order) = parse_ordering(
        query.ordering.as_deref(),
        ORDERING_FIELDS,
        photographer::Column::CreatedAt,
    )?;

    let mut select = photographer::Entity::find();
    if let Some(pattern) = like_pattern(query.search.as_deref()) {
        select = select.filter(
            Expr::expr(Func::lower(Expr::col(photographer::Column::Name)))
                .like(LikeExpr::new(pattern).escape('\\')),
        );
    }

    let count = select.clone().count(&state.db).await?;
    let window = PageWindow::new(query.page, count)?;

    let results = select
        .order_by(sort_column, sort_order)
        .order_by_asc(photographer::Column::Id)
        .offset(Some(window.offset()))
        .limit(Some(PAGE_SIZE))
        .all(&state.db)
        .await?
        .into_iter()
        .map(PhotographerResponse::from)
        .collect();

    let (next, previous) = window.links(uri.path(), uri.query());

    Ok(Json(PhotographerListResponse {
        count,
        next,
        previous,
        results,
    }))
}

#[utoipa::path(
    post,
    path = "/photographers/",
    tag = "Photographers",
    operation_id = "createPhotographer",
    summary = "Register a photographer (staff only)",
    description = "Reuses the photographer with exactly this name and URL when one exists.",
    request_body = CreatePhotographerRequest,
    responses(
        (status = 201, description = "Photographer created", body = PhotographerResponse),
        (status = 200, description = "Existing photographer returned", body = PhotographerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Staff only (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_photographer(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePhotographerRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_staff()?;
    validate_create_photographer(&payload)?;

    let (model, created) =
        linkage::get_or_create(&state.db, payload.name.trim(), payload.url.trim()).await?;

    let status = if created {
        tracing::info!(photographer_id = %model.id, "Created photographer");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(PhotographerResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/photographers/{id}/",
    tag = "Photographers",
    operation_id = "getPhotographer",
    summary = "Get a photographer by ID",
    params(("id" = Uuid, Path, description = "Photographer ID")),
    responses(
        (status = 200, description = "Photographer details", body = PhotographerResponse),
        (status = 404, description = "Photographer not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_photographer(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<PhotographerResponse>, AppError> {
    let model = find_photographer(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/photographers/{id}/",
    tag = "Photographers",
    operation_id = "deletePhotographer",
    summary = "Delete a photographer (staff only)",
    description = "Refused with 409 while any photo still references the photographer.",
    params(("id" = Uuid, Path, description = "Photographer ID")),
    responses(
        (status = 204, description = "Photographer deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Staff only (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Photographer not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Still referenced by photos (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id, user_id = %auth_user.user_id))]
pub async fn delete_photographer(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_staff()?;

    let txn = state.db.begin().await?;
    find_photographer(&txn, id).await?;

    let photo_count = photo::Entity::find()
        .filter(photo::Column::PhotographerId.eq(id))
        .count(&txn)
        .await?;
    if photo_count > 0 {
        return Err(AppError::Conflict(format!(
            "Photographer is still referenced by {photo_count} photo(s)"
        )));
    }

    // A photo inserted concurrently still trips the RESTRICT constraint,
    // which maps to the same 409.
    photographer::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!("Deleted photographer");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_photographer<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<photographer::Model, AppError> {
    photographer::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Photographer not found".into()))
}
