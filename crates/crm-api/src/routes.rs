use super::{customers, login, reports, rooms};
use axum::routing::{get, post};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub(super) fn setup(app_state: super::AppState) -> axum::routing::Router {
    axum::Router::new()
        .route("/customers", get(customers::list).post(customers::create))
        .route(
            "/customers/{id}",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/rooms", post(rooms::create))
        .route("/rooms/{customer_id}", get(rooms::list_for_customer))
        .route("/login", post(login::post))
        .route("/customer-stats", get(reports::stats))
        .route("/customers-pending", get(reports::pending))
        .fallback(fallback)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn fallback(_uri: axum::http::Uri) -> impl axum::response::IntoResponse {
    (axum::http::StatusCode::NOT_FOUND, "not found")
}
