//! Bulk import of photos and photographers from a Pexels-style CSV export.

use std::path::{Path, PathBuf};

use chrono::Utc;
use sea_orm::*;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::entity::{photo, photographer};
use crate::utils::linkage;

/// Failures that abort the whole import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{} file not found", .0.display())]
    FileNotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV header: {0}")]
    Header(#[source] csv::Error),
}

/// Failures confined to a single row; the row is logged and skipped.
#[derive(Debug, Error)]
enum RowError {
    #[error("Missing or malformed column in CSV: {0}")]
    Parse(#[from] csv::Error),
    #[error("Error importing row: {0}")]
    Store(#[from] DbErr),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub photos_created: u64,
    pub photographers_created: u64,
    pub rows_skipped: u64,
}

/// One CSV record. The Pexels `id` and `photographer_id` columns are not kept.
#[derive(Debug, Deserialize)]
struct ImportRow {
    width: i32,
    height: i32,
    url: String,
    photographer: String,
    photographer_url: String,
    avg_color: String,
    #[serde(rename = "src.original")]
    src_original: String,
    #[serde(rename = "src.large2x")]
    src_large2x: String,
    #[serde(rename = "src.large")]
    src_large: String,
    #[serde(rename = "src.medium")]
    src_medium: String,
    #[serde(rename = "src.small")]
    src_small: String,
    #[serde(rename = "src.portrait")]
    src_portrait: String,
    #[serde(rename = "src.landscape")]
    src_landscape: String,
    #[serde(rename = "src.tiny")]
    src_tiny: String,
    alt: String,
}

impl ImportRow {
    fn into_active_model(self, photographer_id: Uuid) -> photo::ActiveModel {
        let now = Utc::now();
        photo::ActiveModel {
            id: Set(Uuid::now_v7()),
            width: Set(self.width),
            height: Set(self.height),
            url: Set(self.url),
            photographer_id: Set(photographer_id),
            avg_color: Set(self.avg_color),
            src_original: Set(self.src_original),
            src_large2x: Set(self.src_large2x),
            src_large: Set(self.src_large),
            src_medium: Set(self.src_medium),
            src_small: Set(self.src_small),
            src_portrait: Set(self.src_portrait),
            src_landscape: Set(self.src_landscape),
            src_tiny: Set(self.src_tiny),
            alt: Set(self.alt),
            owner_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

fn parse_rows(
    data: &[u8],
) -> Result<impl Iterator<Item = Result<ImportRow, csv::Error>> + '_, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);
    reader.headers().map_err(ImportError::Header)?;
    Ok(reader.into_deserialize())
}

/// Import every row of the CSV at `path`.
///
/// Photographers are matched by profile URL and photos by page URL, so running
/// the same file twice creates nothing the second time. Imported photos have
/// no owner.
pub async fn import_photos<C: ConnectionTrait>(
    db: &C,
    path: &Path,
) -> Result<ImportSummary, ImportError> {
    let data = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ImportError::FileNotFound(path.to_path_buf()),
        _ => ImportError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let mut summary = ImportSummary::default();

    for (index, row) in parse_rows(&data)?.enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        match import_row(db, row, &mut summary).await {
            Ok(photo_created) => summary.photos_created += u64::from(photo_created),
            Err(e) => {
                tracing::warn!(line, "{e}");
                summary.rows_skipped += 1;
            }
        }
    }

    tracing::info!(
        photos = summary.photos_created,
        photographers = summary.photographers_created,
        skipped = summary.rows_skipped,
        "Import finished"
    );
    Ok(summary)
}

/// Returns whether a photo was created. A photographer created on the way is
/// counted in `summary` right away, so it is reported even if the photo fails.
async fn import_row<C: ConnectionTrait>(
    db: &C,
    row: Result<ImportRow, csv::Error>,
    summary: &mut ImportSummary,
) -> Result<bool, RowError> {
    let row = row?;

    let existing = photographer::Entity::find()
        .filter(photographer::Column::Url.eq(row.photographer_url.as_str()))
        .one(db)
        .await?;
    let photographer = match existing {
        Some(model) => model,
        None => {
            let (model, created) =
                linkage::get_or_create(db, &row.photographer, &row.photographer_url).await?;
            summary.photographers_created += u64::from(created);
            model
        }
    };

    let photo_exists = photo::Entity::find()
        .filter(photo::Column::Url.eq(row.url.as_str()))
        .one(db)
        .await?
        .is_some();
    if photo_exists {
        return Ok(false);
    }

    row.into_active_model(photographer.id).insert(db).await?;
    Ok(true)
}
