use axum::extract::DefaultBodyLimit;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/press", press_routes())
        .nest("/media", media_routes(config))
        .nest("/admin", admin_routes())
}

fn press_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::press::list_press,
            handlers::press::create_press
        ))
        .routes(routes!(
            handlers::press::get_press,
            handlers::press::update_press,
            handlers::press::delete_press
        ))
}

fn media_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(
            handlers::media::list_media,
            handlers::media::upload_media
        ))
        .layer(DefaultBodyLimit::max(config.server.upload_body_limit));

    upload.routes(routes!(
        handlers::media::get_media,
        handlers::media::delete_media
    ))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::admin::admin_overview))
}
