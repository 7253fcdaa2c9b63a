//! Resolves which photographer a photo write should point at.
//!
//! A write either names an existing photographer by id, or supplies a
//! `(new_photographer_name, new_photographer_url)` pair that is deduplicated
//! against existing rows. After creation the reference can only move through
//! the name/url pair; an id sent with an update is ignored.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::photographer;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// The photographer-related fields of a photo write payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkFields<'a> {
    pub photographer: Option<Uuid>,
    pub new_name: Option<&'a str>,
    pub new_url: Option<&'a str>,
}

/// What the payload asks the resolver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotographerLink {
    /// Point at an existing photographer (creation only).
    Existing(Uuid),
    /// Get-or-create by the exact (name, url) pair.
    New { name: String, url: String },
    /// Leave the stored reference alone (updates only).
    Keep,
}

pub const MISSING_PHOTOGRAPHER: &str = "Provide either \"photographer\" (existing UUID) or both \
     \"new_photographer_name\" and \"new_photographer_url\".";

/// Decide how to link a photographer without touching the store.
pub fn plan<'a>(mode: WriteMode, fields: LinkFields<'a>) -> Result<PhotographerLink, AppError> {
    let non_empty = |s: Option<&'a str>| s.map(str::trim).filter(|s| !s.is_empty());

    if let (Some(name), Some(url)) = (non_empty(fields.new_name), non_empty(fields.new_url)) {
        return Ok(PhotographerLink::New {
            name: name.to_string(),
            url: url.to_string(),
        });
    }

    match mode {
        WriteMode::Create => fields
            .photographer
            .map(PhotographerLink::Existing)
            .ok_or_else(|| AppError::Validation(MISSING_PHOTOGRAPHER.into())),
        WriteMode::Update => Ok(PhotographerLink::Keep),
    }
}

/// Carry out a [`PhotographerLink`], returning the photographer to assign or
/// `None` when the current reference should be kept.
pub async fn resolve<C: ConnectionTrait>(
    db: &C,
    link: PhotographerLink,
) -> Result<Option<photographer::Model>, AppError> {
    match link {
        PhotographerLink::Keep => Ok(None),
        PhotographerLink::Existing(id) => photographer::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(Some)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Invalid photographer \"{id}\": object does not exist"
                ))
            }),
        PhotographerLink::New { name, url } => {
            let (model, created) = get_or_create(db, &name, &url).await?;
            if created {
                tracing::info!(photographer_id = %model.id, "Created photographer");
            }
            Ok(Some(model))
        }
    }
}

/// Atomically fetch the photographer with exactly this (name, url), inserting
/// it first when absent. Returns the row and whether this call created it.
///
/// Never modifies an existing row.
pub async fn get_or_create<C: ConnectionTrait>(
    db: &C,
    name: &str,
    url: &str,
) -> Result<(photographer::Model, bool), DbErr> {
    let now = Utc::now();
    let candidate = photographer::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(name.to_string()),
        url: Set(url.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = photographer::Entity::insert(candidate)
        .on_conflict(
            OnConflict::columns([photographer::Column::Name, photographer::Column::Url])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    let created = match result {
        Ok(rows) => rows > 0,
        Err(DbErr::RecordNotInserted) => false,
        Err(e) => match e.sql_err() {
            // Stores without ON CONFLICT support surface the race as a unique violation.
            Some(SqlErr::UniqueConstraintViolation(_)) => false,
            _ => return Err(e),
        },
    };

    let model = photographer::Entity::find()
        .filter(photographer::Column::Name.eq(name))
        .filter(photographer::Column::Url.eq(url))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("photographer ({name}, {url})")))?;

    Ok((model, created))
}
