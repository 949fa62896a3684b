use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use folio_common::visibility::resolve;
use sea_orm::sea_query::NullOrdering;
use sea_orm::*;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::entity::{media_asset, press};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, Viewer};
use crate::extractors::json::AppJson;
use crate::handlers::media::thumbnail_urls;
use crate::models::press::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Press",
    operation_id = "listPress",
    summary = "List press items",
    description = "Returns a paginated list of press items, highest priority first, then newest date. Anonymous visitors only see published items and items created before drafts existed; signed-in editors see drafts too. Each item carries the URL of its thumbnail's representative rendition.",
    params(PageQuery),
    responses(
        (status = 200, description = "List of press items", body = PressListResponse),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, requester, query))]
pub async fn list_press(
    Viewer(requester): Viewer,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PressListResponse>, AppError> {
    let (page, per_page) = Pagination::window(query.page, query.per_page);

    let visibility = resolve(&requester);
    debug!(?visibility, "resolved press visibility");

    let select = press::Entity::find().filter(visibility.condition(press::Column::Status));

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let models = match Pagination::offset(page, per_page, total) {
        Some(offset) => {
            select
                .order_by_desc(press::Column::Priority)
                .order_by_with_nulls(press::Column::Date, Order::Desc, NullOrdering::Last)
                .order_by_desc(press::Column::Id)
                .offset(Some(offset))
                .limit(Some(per_page))
                .all(&state.db)
                .await?
        }
        None => Vec::new(),
    };

    let urls = thumbnail_urls(&state, models.iter().map(|m| m.thumbnail_id)).await?;
    let data = models
        .into_iter()
        .map(|m| {
            let url = urls.get(&m.thumbnail_id).cloned();
            PressResponse::from_model(m, url)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(PressListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Press",
    operation_id = "getPress",
    summary = "Get a press item by ID",
    description = "Returns one press item if the requester may see it. Drafts are reported as not found to anonymous visitors.",
    params(("id" = i32, Path, description = "Press item ID")),
    responses(
        (status = 200, description = "Press item", body = PressResponse),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Press item not found or not visible (NOT_FOUND)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, requester), fields(id))]
pub async fn get_press(
    Viewer(requester): Viewer,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PressResponse>, AppError> {
    let model = press::Entity::find_by_id(id)
        .filter(resolve(&requester).condition(press::Column::Status))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Press item not found".into()))?;

    Ok(Json(respond(&state, model).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Press",
    operation_id = "createPress",
    summary = "Create a press item",
    description = "Creates a press item. New items are drafts unless `status` says otherwise. `thumbnail` and, for PDF items, `pdf_document` must reference uploaded media.",
    request_body = CreatePressRequest,
    responses(
        (status = 201, description = "Press item created", body = PressResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_press(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePressRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_press(&payload)?;

    ensure_media_exists(&state.db, payload.thumbnail, "thumbnail").await?;
    if let Some(document) = payload.content.document() {
        ensure_media_exists(&state.db, document, "pdf_document").await?;
    }

    let (press_type, pdf_document_id, video_url) = payload.content.into_columns();
    let now = chrono::Utc::now();
    let new_press = press::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        publisher: Set(payload.publisher.trim().to_string()),
        date: Set(payload.date),
        thumbnail_id: Set(payload.thumbnail),
        press_type: Set(press_type),
        pdf_document_id: Set(pdf_document_id),
        video_url: Set(video_url.map(|url| url.trim().to_string())),
        priority: Set(payload.priority.unwrap_or(DEFAULT_PRIORITY)),
        status: Set(Some(payload.status.unwrap_or_default())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_press.insert(&state.db).await?;
    info!(id = model.id, editor = %auth_user.subject, "press item created");

    Ok((StatusCode::CREATED, Json(respond(&state, model).await?)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Press",
    operation_id = "updatePress",
    summary = "Update a press item",
    description = "Partially updates a press item. Omitted fields are left unchanged; `date: null` clears the date. `content` replaces the whole content variant.",
    params(("id" = i32, Path, description = "Press item ID")),
    request_body = UpdatePressRequest,
    responses(
        (status = 200, description = "Press item updated", body = PressResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Press item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_press(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdatePressRequest>,
) -> Result<Json<PressResponse>, AppError> {
    validate_update_press(&payload)?;

    let existing = press::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Press item not found".into()))?;

    if let Some(thumbnail) = payload.thumbnail {
        ensure_media_exists(&state.db, thumbnail, "thumbnail").await?;
    }
    if let Some(document) = payload.content.as_ref().and_then(|c| c.document()) {
        ensure_media_exists(&state.db, document, "pdf_document").await?;
    }

    let mut active: press::ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(publisher) = payload.publisher {
        active.publisher = Set(publisher.trim().to_string());
    }
    if let Some(date) = payload.date {
        active.date = Set(date);
    }
    if let Some(thumbnail) = payload.thumbnail {
        active.thumbnail_id = Set(thumbnail);
    }
    if let Some(content) = payload.content {
        let (press_type, pdf_document_id, video_url) = content.into_columns();
        active.press_type = Set(press_type);
        active.pdf_document_id = Set(pdf_document_id);
        active.video_url = Set(video_url.map(|url| url.trim().to_string()));
    }
    if let Some(priority) = payload.priority {
        active.priority = Set(priority);
    }
    if let Some(status) = payload.status {
        active.status = Set(Some(status));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    info!(id = model.id, editor = %auth_user.subject, "press item updated");

    Ok(Json(respond(&state, model).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Press",
    operation_id = "deletePress",
    summary = "Delete a press item",
    description = "Deletes a press item. Referenced media is kept.",
    params(("id" = i32, Path, description = "Press item ID")),
    responses(
        (status = 204, description = "Press item deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Press item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_press(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let result = press::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Press item not found".into()));
    }
    info!(id, editor = %auth_user.subject, "press item deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn respond(state: &AppState, model: press::Model) -> Result<PressResponse, AppError> {
    let url = thumbnail_urls(state, [model.thumbnail_id])
        .await?
        .remove(&model.thumbnail_id);
    PressResponse::from_model(model, url)
}

async fn ensure_media_exists(
    db: &DatabaseConnection,
    id: Uuid,
    field: &str,
) -> Result<(), AppError> {
    let exists = media_asset::Entity::find_by_id(id).count(db).await? > 0;
    if !exists {
        return Err(AppError::Validation(format!(
            "{field} references unknown media {id}"
        )));
    }
    Ok(())
}
