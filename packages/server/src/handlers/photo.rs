use axum::Json;
use axum::extract::{OriginalUri, State};
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, LockType};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{photo, photographer};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::extractors::query::AppQuery;
use crate::models::photo::*;
use crate::models::shared::{PAGE_SIZE, PageWindow, like_pattern, parse_ordering};
use crate::state::AppState;
use crate::utils::linkage::{self, WriteMode};
use crate::utils::policy::{AccessRequest, MethodClass, authorize};

const ORDERING_FIELDS: &[(&str, photo::Column)] = &[
    ("created_at", photo::Column::CreatedAt),
    ("width", photo::Column::Width),
    ("height", photo::Column::Height),
];

#[utoipa::path(
    get,
    path = "/photos/",
    tag = "Photos",
    operation_id = "listPhotos",
    summary = "List photos with filtering, search and ordering",
    description = "Public. Search matches alt text or photographer name (case-insensitive). 20 photos per page.",
    params(PhotoListQuery),
    responses(
        (status = 200, description = "Page of photos", body = PhotoListResponse),
        (status = 400, description = "Invalid ordering or filter (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Page out of range (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, uri, query))]
pub async fn list_photos(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    AppQuery(query): AppQuery<PhotoListQuery>,
) -> Result<Json<PhotoListResponse>, AppError> {
    let (sort_column, sort_order) = parse_ordering(
        query.ordering.as_deref(),
        ORDERING_FIELDS,
        photo::Column::CreatedAt,
    )?;

    let mut select = photo::Entity::find().left_join(photographer::Entity);

    if let Some(pattern) = like_pattern(query.search.as_deref()) {
        select = select.filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((photo::Entity, photo::Column::Alt))))
                        .like(LikeExpr::new(pattern.clone()).escape('\\')),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        photographer::Entity,
                        photographer::Column::Name,
                    ))))
                    .like(LikeExpr::new(pattern).escape('\\')),
                ),
        );
    }
    if let Some(photographer_id) = query.photographer {
        select = select.filter(photo::Column::PhotographerId.eq(photographer_id));
    }
    if let Some(ref color) = query.avg_color {
        select = select.filter(photo::Column::AvgColor.eq(color.as_str()));
    }
    if let Some(owner_id) = query.owner {
        select = select.filter(photo::Column::OwnerId.eq(owner_id));
    }

    let count = select.clone().count(&state.db).await?;
    let window = PageWindow::new(query.page, count)?;

    let rows = select
        .order_by(sort_column, sort_order)
        .order_by_asc(photo::Column::Id)
        .select_also(photographer::Entity)
        .offset(Some(window.offset()))
        .limit(Some(PAGE_SIZE))
        .all(&state.db)
        .await?;

    let results = rows
        .into_iter()
        .map(|(photo, photographer)| {
            let photographer = photographer.ok_or_else(|| {
                AppError::Internal(format!("Photo {} has no photographer row", photo.id))
            })?;
            Ok(PhotoResponse::new(photo, &photographer))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let (next, previous) = window.links(uri.path(), uri.query());

    Ok(Json(PhotoListResponse {
        count,
        next,
        previous,
        results,
    }))
}

#[utoipa::path(
    post,
    path = "/photos/",
    tag = "Photos",
    operation_id = "createPhoto",
    summary = "Create a photo",
    description = "Requires authentication; the caller becomes the owner. Name the photographer with `photographer` (existing id) or with both `new_photographer_name` and `new_photographer_url` (reused when that exact pair exists).",
    request_body = CreatePhotoRequest,
    responses(
        (status = 201, description = "Photo created", body = PhotoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePhotoRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_photo(&payload)?;
    let link = linkage::plan(WriteMode::Create, payload.link_fields())?;

    let txn = state.db.begin().await?;

    let photographer = linkage::resolve(&txn, link)
        .await?
        .ok_or_else(|| AppError::Internal("Photo creation resolved no photographer".into()))?;

    let now = chrono::Utc::now();
    let new_photo = photo::ActiveModel {
        id: Set(Uuid::now_v7()),
        width: Set(payload.width),
        height: Set(payload.height),
        url: Set(payload.url.trim().to_string()),
        photographer_id: Set(photographer.id),
        avg_color: Set(payload.avg_color.trim().to_string()),
        src_original: Set(payload.src_original.trim().to_string()),
        src_large2x: Set(payload.src_large2x.trim().to_string()),
        src_large: Set(payload.src_large.trim().to_string()),
        src_medium: Set(payload.src_medium.trim().to_string()),
        src_small: Set(payload.src_small.trim().to_string()),
        src_portrait: Set(payload.src_portrait.trim().to_string()),
        src_landscape: Set(payload.src_landscape.trim().to_string()),
        src_tiny: Set(payload.src_tiny.trim().to_string()),
        alt: Set(payload.alt.trim().to_string()),
        owner_id: Set(Some(auth_user.user_id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_photo.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(photo_id = %model.id, photographer_id = %photographer.id, "Created photo");

    Ok((
        StatusCode::CREATED,
        Json(PhotoResponse::new(model, &photographer)),
    ))
}

#[utoipa::path(
    get,
    path = "/photos/{id}/",
    tag = "Photos",
    operation_id = "getPhoto",
    summary = "Get a photo by ID",
    params(("id" = Uuid, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Photo details", body = PhotoResponse),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_photo(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<PhotoResponse>, AppError> {
    let (photo, photographer) = photo::Entity::find_by_id(id)
        .find_also_related(photographer::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".into()))?;

    let photographer = photographer
        .ok_or_else(|| AppError::Internal(format!("Photo {} has no photographer row", id)))?;

    Ok(Json(PhotoResponse::new(photo, &photographer)))
}

#[utoipa::path(
    patch,
    path = "/photos/{id}/",
    tag = "Photos",
    operation_id = "updatePhoto",
    summary = "Partially update a photo",
    description = "Only the owner or a staff user may update a photo; photos without an owner are staff-only. A `photographer` id in the body is ignored; send `new_photographer_name` and `new_photographer_url` to change the photographer.",
    params(("id" = Uuid, Path, description = "Photo ID")),
    request_body = UpdatePhotoRequest,
    responses(
        (status = 200, description = "Photo updated", body = PhotoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, method, payload), fields(id = %id, user_id = %auth_user.user_id))]
pub async fn update_photo(
    auth_user: AuthUser,
    method: Method,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdatePhotoRequest>,
) -> Result<Json<PhotoResponse>, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_photo_for_update(&txn, id).await?;
    authorize(&AccessRequest {
        method: MethodClass::of(&method),
        owner: existing.owner_id,
        requester: Some(auth_user.requester()),
    })
    .into_result()?;

    validate_update_photo(&payload)?;
    let link = linkage::plan(WriteMode::Update, payload.link_fields())?;
    let relinked = linkage::resolve(&txn, link).await?;

    let mut active: photo::ActiveModel = existing.into();

    if let Some(ref photographer) = relinked {
        active.photographer_id = Set(photographer.id);
    }
    if let Some(width) = payload.width {
        active.width = Set(width);
    }
    if let Some(height) = payload.height {
        active.height = Set(height);
    }
    if let Some(url) = payload.url {
        active.url = Set(url.trim().to_string());
    }
    if let Some(color) = payload.avg_color {
        active.avg_color = Set(color.trim().to_string());
    }
    if let Some(src) = payload.src_original {
        active.src_original = Set(src.trim().to_string());
    }
    if let Some(src) = payload.src_large2x {
        active.src_large2x = Set(src.trim().to_string());
    }
    if let Some(src) = payload.src_large {
        active.src_large = Set(src.trim().to_string());
    }
    if let Some(src) = payload.src_medium {
        active.src_medium = Set(src.trim().to_string());
    }
    if let Some(src) = payload.src_small {
        active.src_small = Set(src.trim().to_string());
    }
    if let Some(src) = payload.src_portrait {
        active.src_portrait = Set(src.trim().to_string());
    }
    if let Some(src) = payload.src_landscape {
        active.src_landscape = Set(src.trim().to_string());
    }
    if let Some(src) = payload.src_tiny {
        active.src_tiny = Set(src.trim().to_string());
    }
    if let Some(alt) = payload.alt {
        active.alt = Set(alt.trim().to_string());
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;

    let photographer = match relinked {
        Some(photographer) => photographer,
        None => photographer::Entity::find_by_id(model.photographer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("Photo {} has no photographer row", model.id))
            })?,
    };

    txn.commit().await?;

    Ok(Json(PhotoResponse::new(model, &photographer)))
}

#[utoipa::path(
    delete,
    path = "/photos/{id}/",
    tag = "Photos",
    operation_id = "deletePhoto",
    summary = "Delete a photo",
    description = "Only the owner or a staff user may delete a photo; photos without an owner are staff-only.",
    params(("id" = Uuid, Path, description = "Photo ID")),
    responses(
        (status = 204, description = "Photo deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, method), fields(id = %id, user_id = %auth_user.user_id))]
pub async fn delete_photo(
    auth_user: AuthUser,
    method: Method,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_photo_for_update(&txn, id).await?;
    authorize(&AccessRequest {
        method: MethodClass::of(&method),
        owner: existing.owner_id,
        requester: Some(auth_user.requester()),
    })
    .into_result()?;

    photo::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!("Deleted photo");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_photo_for_update(
    txn: &DatabaseTransaction,
    id: Uuid,
) -> Result<photo::Model, AppError> {
    photo::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".into()))
}
