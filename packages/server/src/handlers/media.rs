use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use folio_common::storage::{AssetKey, AssetStore, StorageError};
use folio_media::{Derivative, SourceImage};
use sea_orm::*;
use tokio_util::io::ReaderStream;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::entity::{media_asset, media_derivative, press};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::media::*;
use crate::state::AppState;
use crate::utils::filename::normalize_upload_filename;

/// An upload read from the `file` field of a multipart body.
struct Upload {
    filename: String,
    mime_type: String,
    data: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Media",
    operation_id = "uploadMedia",
    summary = "Upload a media file",
    description = "Stores the `file` field of a multipart body and generates the configured derivatives for images. A derivative that cannot be produced does not fail the upload; its name is listed in `failed_derivatives`. Non-image uploads get no derivatives.",
    request_body(content_type = "multipart/form-data", description = "Multipart form with a `file` field"),
    responses(
        (status = 201, description = "Media stored", body = UploadMediaResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 413, description = "File too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn upload_media(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let upload = read_upload(&mut multipart, state.config.storage.max_object_size).await?;

    let asset_id = Uuid::now_v7();
    let original_key = AssetKey::new(asset_id, upload.filename.as_str())?;
    let original = state.assets.put(&original_key, &upload.data).await?;
    info!(
        asset = %asset_id,
        editor = %auth_user.subject,
        mime_type = %upload.mime_type,
        size = original.size,
        "stored original"
    );

    let pipeline = Arc::clone(&state.pipeline);
    let mime_type = upload.mime_type.clone();
    let data = upload.data;
    let generated = tokio::task::spawn_blocking(move || {
        pipeline.generate(&SourceImage {
            bytes: &data,
            mime_type: &mime_type,
        })
    })
    .await;
    let report = match generated {
        Ok(report) => report,
        Err(e) => {
            remove_orphaned_files(state.assets.as_ref(), asset_id).await;
            return Err(AppError::Internal(format!("Derivative task failed: {e}")));
        }
    };

    let mut failed_derivatives = Vec::new();
    let mut rows = Vec::new();
    for spec in state.pipeline.set().iter() {
        if let Some(derivative) = report.derivatives.get(&spec.name) {
            match store_derivative(state.assets.as_ref(), &original_key, derivative).await {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warn!(derivative = %spec.name, error = %e, "failed to store derivative");
                    failed_derivatives.push(spec.name.clone());
                }
            }
        } else if report.failures.iter().any(|f| f.name == spec.name) {
            failed_derivatives.push(spec.name.clone());
        }
    }

    let asset = media_asset::ActiveModel {
        id: Set(asset_id),
        filename: Set(upload.filename),
        mime_type: Set(upload.mime_type),
        size: Set(to_i64(original.size)),
        content_hash: Set(original.hash.to_hex()),
        width: Set(report.source_dimensions.map(|d| to_i32(d.width))),
        height: Set(report.source_dimensions.map(|d| to_i32(d.height))),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let (asset, derivatives) = match insert_asset(&state.db, asset, rows).await {
        Ok(inserted) => inserted,
        Err(e) => {
            remove_orphaned_files(state.assets.as_ref(), asset_id).await;
            return Err(e.into());
        }
    };

    info!(
        asset = %asset_id,
        derivatives = derivatives.len(),
        failed = failed_derivatives.len(),
        skipped = report.skipped,
        "media uploaded"
    );

    let media = MediaResponse::build(
        asset,
        derivatives,
        &state.config.storage,
        &state.pipeline.set().representative().name,
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadMediaResponse {
            media,
            failed_derivatives,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Media",
    operation_id = "listMedia",
    summary = "List media",
    description = "Returns a paginated list of uploaded media, newest first, each with its derivatives.",
    params(PageQuery),
    responses(
        (status = 200, description = "List of media", body = MediaListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_media(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<MediaListResponse>, AppError> {
    let (page, per_page) = Pagination::window(query.page, query.per_page);

    let total = media_asset::Entity::find()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let assets = match Pagination::offset(page, per_page, total) {
        Some(offset) => {
            media_asset::Entity::find()
                .order_by_desc(media_asset::Column::CreatedAt)
                .order_by_desc(media_asset::Column::Id)
                .offset(Some(offset))
                .limit(Some(per_page))
                .all(&state.db)
                .await?
        }
        None => Vec::new(),
    };

    let ids: Vec<Uuid> = assets.iter().map(|a| a.id).collect();
    let mut by_asset: HashMap<Uuid, Vec<media_derivative::Model>> = HashMap::new();
    if !ids.is_empty() {
        for d in media_derivative::Entity::find()
            .filter(media_derivative::Column::AssetId.is_in(ids))
            .all(&state.db)
            .await?
        {
            by_asset.entry(d.asset_id).or_default().push(d);
        }
    }

    let representative = &state.pipeline.set().representative().name;
    let data = assets
        .into_iter()
        .map(|asset| {
            let derivatives = by_asset.remove(&asset.id).unwrap_or_default();
            MediaResponse::build(asset, derivatives, &state.config.storage, representative)
        })
        .collect();

    Ok(Json(MediaListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Media",
    operation_id = "getMedia",
    summary = "Get media by ID",
    params(("id" = Uuid, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media with derivatives", body = MediaResponse),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MediaResponse>, AppError> {
    let asset = find_asset(&state.db, id).await?;
    let derivatives = media_derivative::Entity::find()
        .filter(media_derivative::Column::AssetId.eq(id))
        .all(&state.db)
        .await?;

    Ok(Json(MediaResponse::build(
        asset,
        derivatives,
        &state.config.storage,
        &state.pipeline.set().representative().name,
    )))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Media",
    operation_id = "deleteMedia",
    summary = "Delete media",
    description = "Deletes an asset, its derivatives and their stored files. Media still used by a press item cannot be deleted.",
    params(("id" = Uuid, Path, description = "Media ID")),
    responses(
        (status = 204, description = "Media deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Media is referenced (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn delete_media(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    find_asset(&state.db, id).await?;

    let references = press::Entity::find()
        .filter(
            Condition::any()
                .add(press::Column::ThumbnailId.eq(id))
                .add(press::Column::PdfDocumentId.eq(id)),
        )
        .count(&state.db)
        .await?;
    if references > 0 {
        return Err(AppError::Conflict(format!(
            "Media is used by {references} press item(s)"
        )));
    }

    let txn = state.db.begin().await?;
    media_derivative::Entity::delete_many()
        .filter(media_derivative::Column::AssetId.eq(id))
        .exec(&txn)
        .await?;
    media_asset::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    let removed = state.assets.delete_asset(id).await?;
    info!(asset = %id, editor = %auth_user.subject, files = removed, "media deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Serve an original or one of its derivatives by stored filename.
#[instrument(skip(state, headers), fields(id = %id, filename = %filename))]
pub async fn serve_media(
    State(state): State<AppState>,
    Path((id, filename)): Path<(Uuid, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound("Media file not found".into());

    let asset = media_asset::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(not_found)?;

    let (mime_type, size, content_hash, inline) = if asset.filename == filename {
        let inline = displays_inline(&state, &asset.mime_type);
        (asset.mime_type, asset.size, asset.content_hash, inline)
    } else {
        let derivative = media_derivative::Entity::find()
            .filter(media_derivative::Column::AssetId.eq(id))
            .filter(media_derivative::Column::Filename.eq(filename.as_str()))
            .one(&state.db)
            .await?
            .ok_or_else(not_found)?;
        (derivative.mime_type, derivative.size, derivative.content_hash, true)
    };

    let etag_value = format!("\"{content_hash}\"");
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && val.split(',').any(|tag| {
            let tag = tag.trim();
            tag == etag_value || tag == "*"
        })
    {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag_value)]).into_response());
    }

    let key = AssetKey::new(id, filename.as_str())?;
    let reader = state.assets.get_stream(&key).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&filename, inline),
        )
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

/// Representative rendition URL for each of `ids`, falling back to the
/// original when the rendition is missing. Unknown IDs are left out.
pub(crate) async fn thumbnail_urls(
    state: &AppState,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, String>, AppError> {
    let ids: Vec<Uuid> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let storage = &state.config.storage;

    let mut urls: HashMap<Uuid, String> = media_asset::Entity::find()
        .filter(media_asset::Column::Id.is_in(ids.clone()))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|a| (a.id, object_url(storage, a.id, &a.filename)))
        .collect();

    let representative = state.pipeline.set().representative().name.as_str();
    for d in media_derivative::Entity::find()
        .filter(media_derivative::Column::AssetId.is_in(ids))
        .filter(media_derivative::Column::Name.eq(representative))
        .all(&state.db)
        .await?
    {
        urls.insert(d.asset_id, object_url(storage, d.asset_id, &d.filename));
    }

    Ok(urls)
}

async fn find_asset(db: &DatabaseConnection, id: Uuid) -> Result<media_asset::Model, AppError> {
    media_asset::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".into()))
}

async fn insert_asset(
    db: &DatabaseConnection,
    asset: media_asset::ActiveModel,
    derivatives: Vec<media_derivative::ActiveModel>,
) -> Result<(media_asset::Model, Vec<media_derivative::Model>), DbErr> {
    let txn = db.begin().await?;
    let asset = asset.insert(&txn).await?;
    let mut inserted = Vec::with_capacity(derivatives.len());
    for derivative in derivatives {
        inserted.push(derivative.insert(&txn).await?);
    }
    txn.commit().await?;
    Ok((asset, inserted))
}

async fn remove_orphaned_files(store: &dyn AssetStore, asset: Uuid) {
    if let Err(e) = store.delete_asset(asset).await {
        warn!(asset = %asset, error = %e, "failed to remove orphaned files");
    }
}

async fn store_derivative(
    store: &dyn AssetStore,
    original: &AssetKey,
    derivative: &Derivative,
) -> Result<media_derivative::ActiveModel, StorageError> {
    let key = AssetKey::derivative(
        original.asset(),
        original.file(),
        &derivative.name,
        derivative.format.extension(),
    )?;
    let stored = store.put(&key, &derivative.bytes).await?;

    Ok(media_derivative::ActiveModel {
        id: Set(Uuid::now_v7()),
        asset_id: Set(original.asset()),
        name: Set(derivative.name.clone()),
        filename: Set(key.file().to_string()),
        mime_type: Set(derivative.format.mime_type().to_string()),
        width: Set(to_i32(derivative.dimensions.width)),
        height: Set(to_i32(derivative.dimensions.height)),
        size: Set(to_i64(stored.size)),
        content_hash: Set(stored.hash.to_hex()),
        ..Default::default()
    })
}

async fn read_upload(multipart: &mut Multipart, max_size: u64) -> Result<Upload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let raw_name = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| AppError::Validation("The file field must carry a filename".into()))?;
        let filename = normalize_upload_filename(&raw_name)
            .map_err(|e| AppError::Validation(e.message().into()))?;
        let declared = field.content_type().map(str::to_owned);

        let data = read_field(field, max_size).await?;
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".into()));
        }

        let mime_type = resolve_mime_type(declared.as_deref(), &filename);
        return Ok(Upload {
            filename,
            mime_type,
            data,
        });
    }

    Err(AppError::Validation("Missing 'file' field".into()))
}

async fn read_field(mut field: Field<'_>, max_size: u64) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if (data.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Upload read error: {}", e.body_text()))
    }
}

/// The declared content type, or a guess from the extension when the client
/// sent none or a generic one.
fn resolve_mime_type(declared: Option<&str>, filename: &str) -> String {
    match declared.map(str::trim) {
        Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => {
            mime.to_ascii_lowercase()
        }
        _ => mime_guess::from_path(filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

/// Whether an original may render in the browser. Only images the pipeline
/// accepts and PDFs do; anything else is served as a download.
fn displays_inline(state: &AppState, mime_type: &str) -> bool {
    mime_type == "application/pdf" || state.pipeline.classify(mime_type).is_ok()
}

/// Build a safe `Content-Disposition` header value.
fn content_disposition_value(filename: &str, inline: bool) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "download".to_string()
    } else {
        ascii_safe
    };
    let disposition = if inline { "inline" } else { "attachment" };
    format!("{disposition}; filename=\"{ascii_name}\"")
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
