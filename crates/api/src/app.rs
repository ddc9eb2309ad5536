use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use domain::services::MessageSender;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin,
    require_super_admin, security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{flows, health, intents, settings, tenants, webhook};
use crate::services::{pipeline::MessagePipeline, spam_guard::SpamGuard};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub pipeline: Arc<MessagePipeline>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool, sender: Arc<dyn MessageSender>) -> Router {
    let config = Arc::new(config);

    // Rate limiter for the admin surface (rate_limit_per_minute = 0 disables)
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let spam_guard = Arc::new(SpamGuard::new());
    let pipeline = Arc::new(MessagePipeline::new(pool.clone(), sender, spam_guard));

    let state = AppState {
        pool,
        config: config.clone(),
        pipeline,
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Webhook routes: Meta authenticates with the verify token (GET) and the
    // payload signature (POST), never with an admin key.
    let webhook_routes = Router::new()
        .route("/api/webhook", get(webhook::verify))
        .route("/api/webhook", post(webhook::receive));

    // Admin routes scoped to one tenant; a tenant-scoped key suffices.
    // Middleware order: auth runs first, then rate limiting (needs auth info).
    let admin_routes = Router::new()
        .route("/api/v1/admin/tenants/:tenant_id", get(tenants::get_tenant))
        .route(
            "/api/v1/admin/tenants/:tenant_id",
            put(tenants::update_tenant),
        )
        .route(
            "/api/v1/admin/tenants/:tenant_id/intents",
            get(intents::list_intents).post(intents::create_intent),
        )
        .route(
            "/api/v1/admin/tenants/:tenant_id/intents/:intent_id",
            delete(intents::delete_intent),
        )
        .route(
            "/api/v1/admin/tenants/:tenant_id/intents/:intent_id/examples",
            get(intents::list_examples).post(intents::add_example),
        )
        .route(
            "/api/v1/admin/tenants/:tenant_id/intents/:intent_id/examples/:example_id",
            delete(intents::delete_example),
        )
        .route(
            "/api/v1/admin/tenants/:tenant_id/flows",
            get(flows::list_flows),
        )
        .route(
            "/api/v1/admin/tenants/:tenant_id/flows/:intent_name",
            get(flows::get_flow)
                .put(flows::save_flow)
                .delete(flows::delete_flow),
        )
        .route(
            "/api/v1/admin/tenants/:tenant_id/settings",
            get(settings::get_settings),
        )
        .route(
            "/api/v1/admin/tenants/:tenant_id/settings/:key",
            put(settings::put_setting).delete(settings::delete_setting),
        )
        .route(
            "/api/v1/admin/tenants/:tenant_id/profile",
            get(settings::get_profile).put(settings::put_profile),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Tenant lifecycle routes require a super admin key.
    let super_admin_routes = Router::new()
        .route(
            "/api/v1/admin/tenants",
            get(tenants::list_tenants).post(tenants::create_tenant),
        )
        .route(
            "/api/v1/admin/tenants/:tenant_id",
            delete(tenants::delete_tenant),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_super_admin,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(webhook_routes)
        .merge(admin_routes)
        .merge(super_admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
