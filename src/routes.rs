//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod appointment;
mod auth;
mod coach;
mod contract;
mod log;
mod member;
mod membership;
mod membership_type;
mod settings;

use crate::auth::auth_middleware;
use crate::config::PagingConfig;
use crate::error::ApiResult;
use crate::extract::RequestId;
use crate::models::{Envelope, ListData};
use crate::query::{execute, ListQuery, Pagination, Searchable};
use crate::state::SharedState;
use crate::store::Repository;
use crate::uploads::STATIC_PREFIX;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::{debug, Level};

/// Successful handler response
pub(crate) type Reply<T> = ApiResult<Json<Envelope<T>>>;

pub(crate) fn ok<T>(data: T, request_id: RequestId) -> Reply<T> {
    Ok(Json(Envelope::success(data, request_id)))
}

/// Success with `data: null`.
pub(crate) fn done(request_id: RequestId) -> Reply<()> {
    Ok(Json(Envelope::empty(request_id)))
}

/// Filter and window one collection for a list endpoint.
pub(crate) async fn fetch_page<R: Searchable>(
    repo: &dyn Repository<R>,
    query: &ListQuery,
    paging: &PagingConfig,
) -> ApiResult<ListData<R>> {
    let pagination = Pagination::from_query(query, paging.default_limit, paging.max_limit);
    let filter = R::filter(query);
    let page = execute(repo.list().await?, &filter, pagination);

    debug!(
        "Listed {}: {} matched, {} returned (skip={}, limit={})",
        R::COLLECTION,
        page.total,
        page.items.len(),
        pagination.skip,
        pagination.limit
    );
    Ok(ListData::new(R::COLLECTION, page))
}

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState) -> Router {
    let settings = state.config.clone();

    // Build CORS layer
    let cors = build_cors_layer(&settings.cors.allowed_origins);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware_stack = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    let mut admin = admin_routes();
    if settings.auth.required {
        admin = admin.route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));
    }

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Auth routes
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/currentUser", get(auth::current_user))

        .nest("/api/admin", admin)
        .nest_service(STATIC_PREFIX, ServeDir::new(&settings.storage.upload_dir))

        // Apply middleware and state
        .layer(DefaultBodyLimit::max(settings.storage.max_upload_bytes))
        .layer(middleware_stack)
        .with_state(state)
}

fn admin_routes() -> Router<SharedState> {
    Router::new()
        // Coaches
        .route("/coaches", get(coach::list_coaches).post(coach::create_coach))
        .route(
            "/coaches/{id}",
            get(coach::get_coach)
                .put(coach::update_coach)
                .delete(coach::delete_coach),
        )
        .route("/coaches/{id}/avatar", put(coach::upload_avatar))

        // Members
        .route("/users", get(member::list_members).post(member::create_member))
        .route(
            "/users/{id}",
            get(member::get_member)
                .put(member::update_member)
                .delete(member::delete_member),
        )

        // Membership types
        .route(
            "/membership-types",
            get(membership_type::list_types).post(membership_type::create_type),
        )
        .route(
            "/membership-types/{id}",
            get(membership_type::get_type)
                .put(membership_type::update_type)
                .delete(membership_type::delete_type),
        )

        // Membership cards
        .route(
            "/memberships",
            get(membership::list_memberships).post(membership::issue_membership),
        )
        .route("/memberships/{id}", get(membership::get_membership))
        .route("/memberships/{id}/revoke", put(membership::revoke_membership))

        // Appointments
        .route(
            "/appointments",
            get(appointment::list_appointments).post(appointment::create_appointment),
        )
        .route(
            "/appointments/{id}",
            get(appointment::get_appointment)
                .put(appointment::update_appointment)
                .delete(appointment::delete_appointment),
        )
        .route("/appointments/{id}/cancel", put(appointment::cancel_appointment))

        // Contracts
        .route(
            "/contracts",
            get(contract::list_contracts).post(contract::create_contract),
        )
        .route("/contracts/user/{uid}", get(contract::list_member_contracts))
        .route(
            "/contracts/{contract_id}",
            get(contract::get_contract).delete(contract::delete_contract),
        )

        // Activity logs
        .route("/logs", get(log::list_logs))

        // System settings
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
}

/// Build CORS layer from the configured origins
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<_> = allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
