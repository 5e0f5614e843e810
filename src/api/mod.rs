pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // Auth routes
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .merge(password_routes(app_state.clone()))

        .nest("/api", api_routes(app_state.clone()))

        .with_state(app_state)

        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Signed in, but exempt from the forced password change gate.
fn password_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/password", post(handlers::auth::change_password))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn api_routes(state: AppState) -> Router<AppState> {
    // Layers run bottom-up: auth, then the password gate, then the status refresh.
    Router::new()
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route("/reminders", get(handlers::dashboard::reminders))
        .route("/plans", get(handlers::admin::plans))
        .route("/sample-data", post(handlers::admin::sample_data))
        .nest("/members", member_routes())
        .nest("/reports", report_routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::refresh::refresh_member_statuses,
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_password_changed,
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::members::list).post(handlers::members::create))
        .route(
            "/:id",
            get(handlers::members::get)
                .put(handlers::members::update)
                .delete(handlers::members::delete),
        )
        .route(
            "/:id/payments",
            get(handlers::payments::list_by_member).post(handlers::payments::create),
        )
        .route(
            "/:id/renewal",
            get(handlers::renewals::preview).post(handlers::renewals::renew),
        )
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/members.csv", get(handlers::reports::members_csv))
        .route("/payments.csv", get(handlers::reports::payments_csv))
        .route("/revenue", get(handlers::reports::revenue))
        .route("/revenue.csv", get(handlers::reports::revenue_csv))
}
