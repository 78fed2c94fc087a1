use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use chrono::Utc;
use emoji_feed_service::auth::JwtVerifier;
use emoji_feed_service::db::{PgPostStore, PostStore};
use emoji_feed_service::directory::{HttpUserDirectory, UserDirectory};
use emoji_feed_service::handlers;
use emoji_feed_service::middleware::JwtAuthMiddleware;
use emoji_feed_service::openapi::ApiDoc;
use emoji_feed_service::services::FeedContext;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

struct HealthState {
    db_pool: sqlx::Pool<sqlx::Postgres>,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

impl HealthState {
    async fn check_postgres(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.db_pool)
            .await
            .map(|_| ())
    }
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.check_postgres().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "emoji-feed-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "emoji-feed-service"
        })),
    }
}

async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let mut checks = HashMap::new();

    let start = Instant::now();
    let pg_result = state.check_postgres().await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);
    let ready = pg_result.is_ok();
    let postgres_check = match pg_result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "PostgreSQL connection successful".to_string(),
            latency_ms,
        },
        Err(e) => ComponentCheck {
            status: ComponentStatus::Unhealthy,
            message: format!("PostgreSQL connection failed: {}", e),
            latency_ms,
        },
    };
    checks.insert("postgresql".to_string(), postgres_check);

    let response = ReadinessResponse {
        ready,
        status: if ready {
            ComponentStatus::Healthy
        } else {
            ComponentStatus::Unhealthy
        },
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Emoji Feed Service
///
/// Serves the `posts.*` and `profile.*` procedures over HTTP/JSON:
///
/// - `GET    /api/v1/posts`              posts.getAll
/// - `POST   /api/v1/posts`              posts.create
/// - `DELETE /api/v1/posts/{id}`         posts.delete
/// - `GET    /api/v1/posts/emojis/top`   posts.getMostUsedEmojis
/// - `GET    /api/v1/posts/authors/top`  posts.getMostActiveUsers
/// - `GET    /api/v1/profiles/{username}` profile.getUserByUsername
///
/// Posts live in PostgreSQL; users are resolved from the identity provider on
/// every request.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    // Support container healthchecks via CLI subcommand: `healthcheck-http` or legacy `healthcheck`
    {
        let mut args = std::env::args();
        let _bin = args.next();
        if let Some(cmd) = args.next() {
            if cmd == "healthcheck" || cmd == "healthcheck-http" {
                let port = std::env::var("FEED_SERVICE_PORT").unwrap_or_else(|_| "8082".into());
                let url = format!("http://127.0.0.1:{}/api/v1/health", port);
                match reqwest::Client::new().get(&url).send().await {
                    Ok(resp) if resp.status().is_success() => return Ok(()),
                    Ok(resp) => {
                        eprintln!("healthcheck HTTP status: {}", resp.status());
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"));
                    }
                    Err(e) => {
                        eprintln!("healthcheck HTTP error: {}", e);
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"));
                    }
                }
            }
        }
    }

    // Load configuration
    let config = match emoji_feed_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    let json_logs = config.app.json_logs;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting emoji-feed-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let verifier = match config.auth.jwt_public_key_pem.as_deref() {
        Some(pem) => Some(Arc::new(JwtVerifier::from_rsa_pem(pem).map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to initialize JWT keys: {e}"),
            )
        })?)),
        None => {
            tracing::warn!(
                "JWT_PUBLIC_KEY_PEM not configured; posts.create and posts.delete will reject every request"
            );
            None
        }
    };

    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                io::Error::new(io::ErrorKind::Other, format!("Migrations failed: {e}"))
            })?;
        tracing::info!("Database migrations applied");
    }

    let directory = HttpUserDirectory::new(&config.identity).map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to initialize identity directory: {e}"),
        )
    })?;
    tracing::info!(api_url = %config.identity.api_url, "Identity directory client initialized");

    let post_store: Arc<dyn PostStore> = Arc::new(PgPostStore::new(db_pool.clone()));
    let user_directory: Arc<dyn UserDirectory> = Arc::new(directory);
    let feed_ctx = web::Data::new(FeedContext::new(
        post_store,
        user_directory,
        config.feed.clone(),
    ));
    let health_state = web::Data::new(HealthState { db_pool });
    let openapi_doc = web::Data::new(ApiDoc::openapi());
    let auth = JwtAuthMiddleware::new(verifier);

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(openapi_doc.clone())
            .app_data(feed_ctx.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(ApiDoc::openapi_json_path(), web::get().to(openapi_json))
            .route(
                "/metrics",
                web::get().to(emoji_feed_service::metrics::serve_metrics),
            )
            // Health check endpoints
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/ready", web::get().to(readiness_summary))
            .route("/api/v1/health/live", web::get().to(liveness_check))
            .configure(handlers::configure(auth.clone()))
    })
    .bind(&http_bind_address)?
    .workers(4)
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    let finished = tokio::select! {
        joined = &mut server_task => Some(joined),
        _ = shutdown_signal() => None,
    };

    let joined = match finished {
        Some(joined) => joined,
        None => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            server_task.await
        }
    };

    let result = match joined {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Server task join error: {}", e);
            Err(io::Error::new(io::ErrorKind::Other, e.to_string()))
        }
    };

    tracing::info!("Emoji-feed-service shutting down");
    result
}
