//! Gym Admin API server
//!
//! Serves the administrative REST API for coaches, members, membership
//! cards, appointments, contracts, activity logs and system settings.

use gym_admin_api::seed::demo_repositories;
use gym_admin_api::state::Repositories;
use gym_admin_api::{create_router, AppState, Settings};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting Gym Admin API...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    if std::env::var("JWT_SECRET").is_err() {
        warn!("⚠️  JWT_SECRET not set, using default (INSECURE - set in production!)");
    }
    if settings.auth.required {
        info!("🔒 Bearer token required on /api/admin routes");
    }

    let repos = if settings.storage.seed_data {
        info!("🌱 Loading demo data");
        demo_repositories()
    } else {
        Repositories::in_memory()
    };

    tokio::fs::create_dir_all(&settings.storage.upload_dir).await?;
    let addr = SocketAddr::from((settings.server.host, settings.server.port));
    let upload_dir = settings.storage.upload_dir.display().to_string();

    let state = Arc::new(AppState::new(settings, repos)?);

    // Build the router
    let app = create_router(state);

    info!("🌐 Server listening on http://{}", addr);
    info!("📁 Uploads stored in {}", upload_dir);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Authentication ───");
    info!("   POST /api/auth/login                    - Login with identifier/password");
    info!("   POST /api/auth/logout                   - Logout");
    info!("   GET  /api/auth/currentUser              - Current admin profile");
    info!("");
    info!("   ─── Administration ───");
    info!("   GET|POST       /api/admin/coaches       - List / create coaches");
    info!("   PUT            /api/admin/coaches/{{id}}/avatar - Upload avatar");
    info!("   GET|POST       /api/admin/users         - List / register members");
    info!("   GET|POST       /api/admin/membership-types");
    info!("   GET|POST       /api/admin/memberships   - List / issue cards");
    info!("   PUT            /api/admin/memberships/{{id}}/revoke");
    info!("   GET|POST       /api/admin/appointments  - List / book");
    info!("   PUT            /api/admin/appointments/{{id}}/cancel");
    info!("   GET|POST       /api/admin/contracts     - List / file contracts");
    info!("   GET            /api/admin/contracts/user/{{uid}}");
    info!("   GET            /api/admin/logs          - Activity log");
    info!("   GET|PUT        /api/admin/settings      - System settings");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gym_admin_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
