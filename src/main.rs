use axum::middleware::from_fn_with_state;
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod services;
mod state;

use config::AppConfig;
use state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // A production run without an explicit signing secret refuses to start.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Starting Interview API in {:?} mode", config.environment);

    let pool = database::manager::connect(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect database: {}", e));

    if let Err(e) = database::manager::migrate(&pool).await {
        tracing::error!("Migration failed: {}", e);
        std::process::exit(1);
    }

    // Allow tests or deployments to override port via env
    let port = std::env::var("INTERVIEW_API_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let enable_cors = config.security.enable_cors;
    let state = AppState::new(pool, config);
    let mut app = app(state);

    if enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    let app = app.layer(TraceLayer::new_for_http());

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Interview API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected API (JWT auth gate runs first on every route)
        .merge(session_routes(state.clone()))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public;

    Router::new()
        // Account signup and credential login
        .route("/api/users", post(public::user_post))
        .route("/api/sessions", post(public::login_post))
}

fn session_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::sessions;

    Router::new()
        .route(
            "/api/interview-sessions",
            post(sessions::session_post).get(sessions::session_list),
        )
        .route("/api/interview-sessions/:id", get(sessions::session_get))
        .route(
            "/api/interview-sessions/:id/questions",
            get(sessions::questions_get).post(sessions::questions_post),
        )
        .route("/api/interview-sessions/:id/answers", post(sessions::answers_post))
        .route("/api/interview-sessions/:id/summary", get(sessions::summary_get))
        .route_layer(from_fn_with_state(state, middleware::jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Interview API",
            "version": version,
            "description": "Interview session backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "signup": "POST /api/users (public)",
                "login": "POST /api/sessions (public)",
                "sessions": "/api/interview-sessions[/:id] (protected)",
                "questions": "/api/interview-sessions/:id/questions (protected)",
                "answers": "/api/interview-sessions/:id/answers (protected)",
                "summary": "/api/interview-sessions/:id/summary (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::manager::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
