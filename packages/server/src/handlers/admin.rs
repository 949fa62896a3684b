use axum::Json;
use axum::extract::State;
use folio_common::visibility::can_enter_admin;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::admin::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Admin",
    operation_id = "getAdminOverview",
    summary = "Admin panel configuration",
    description = "Returns the collections the admin panel manages and the media upload settings: accepted mime types, the representative thumbnail and the derivative list.",
    responses(
        (status = 200, description = "Admin configuration", body = AdminOverview),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn admin_overview(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AdminOverview>, AppError> {
    let identity = auth_user.identity();
    if !can_enter_admin(&identity) {
        return Err(AppError::PermissionDenied);
    }

    let set = state.pipeline.set();
    Ok(Json(AdminOverview {
        editor: identity.subject().to_string(),
        collections: collections(),
        media: MediaSettings {
            admin_thumbnail: set.representative().name.clone(),
            mime_types: state.pipeline.mime_types().to_vec(),
            derivatives: set.iter().cloned().collect(),
        },
    }))
}
