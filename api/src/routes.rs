use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::pretty_json_middleware;
use crate::state::AppState;

/// Create the main application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let bakery_routes = Router::new()
        .route("/bakeries", get(handlers::bakeries::list_bakeries))
        .route(
            "/bakeries/:id",
            get(handlers::bakeries::get_bakery).patch(handlers::bakeries::update_bakery),
        );

    // Static segments take precedence over `:id`
    let baked_good_routes = Router::new()
        .route("/baked_goods", post(handlers::baked_goods::create_baked_good))
        .route(
            "/baked_goods/by_price",
            get(handlers::baked_goods::baked_goods_by_price),
        )
        .route(
            "/baked_goods/most_expensive",
            get(handlers::baked_goods::most_expensive_baked_good),
        )
        .route(
            "/baked_goods/:id",
            delete(handlers::baked_goods::delete_baked_good),
        );

    let ops_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::metrics_handler));

    Router::new()
        .route("/", get(handlers::index::index))
        .merge(bakery_routes)
        .merge(baked_good_routes)
        .merge(ops_routes)
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    pretty_json_middleware,
                )),
        )
        .with_state(state)
}
