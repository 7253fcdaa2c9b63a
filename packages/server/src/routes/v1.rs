use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{auth, health, photo, photographer};
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(auth_routes())
        .merge(photographer_routes())
        .merge(photo_routes())
        .routes(routes!(health::health))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .routes(routes!(auth::refresh))
}

fn photographer_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            photographer::list_photographers,
            photographer::create_photographer
        ))
        .routes(routes!(
            photographer::get_photographer,
            photographer::delete_photographer
        ))
}

fn photo_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(photo::list_photos, photo::create_photo))
        .routes(routes!(
            photo::get_photo,
            photo::update_photo,
            photo::delete_photo
        ))
}
