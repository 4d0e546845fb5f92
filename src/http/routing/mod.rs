use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn app(api: Router, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", api)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
}
