//! Reclaim server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Json, Router, routing::get};
use sea_orm::{ConnectOptions, Database};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reclaim_api::{AppState, router as api_router};
use reclaim_common::{Config, IdGenerator};
use reclaim_core::{
    CatalogService, ClaimService, EmailConfig, EmailService, FinalizeService, FoundItemService,
    LostItemService, MatchingService, NotificationDispatcher, NotificationService, PrivacyService,
    SecurityQuestionService, StatsService, UserService,
};
use reclaim_db::repositories::{
    CategoryRepository, ClaimAttemptRepository, FoundItemRepository, LocationRepository,
    LostItemRepository, MatchScoreRepository, NotificationLogRepository, NotificationRepository,
    SecurityQuestionRepository, SuccessfulReturnRepository, UserRepository,
};
use reclaim_scheduler::{Sweeper, run_sweeps};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reclaim=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting reclaim server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let mut db_opts = ConnectOptions::new(&config.database.url);
    db_opts
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections);

    let db = Database::connect(db_opts).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    reclaim_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let users = UserRepository::new(Arc::clone(&db));
    let lost_items = LostItemRepository::new(Arc::clone(&db));
    let found_items = FoundItemRepository::new(Arc::clone(&db));
    let claim_attempts = ClaimAttemptRepository::new(Arc::clone(&db));
    let questions = SecurityQuestionRepository::new(Arc::clone(&db));
    let returns = SuccessfulReturnRepository::new(Arc::clone(&db));
    let notifications = NotificationRepository::new(Arc::clone(&db));
    let notification_log = NotificationLogRepository::new(Arc::clone(&db));
    let match_scores = MatchScoreRepository::new(Arc::clone(&db));
    let categories = CategoryRepository::new(Arc::clone(&db));
    let locations = LocationRepository::new(Arc::clone(&db));

    // Initialize services
    let email_service = EmailService::new(EmailConfig::from_settings(
        &config.email,
        &config.server.public_url,
    ));
    let dispatcher = NotificationDispatcher::new(
        notifications.clone(),
        email_service,
        IdGenerator::new(),
    );
    let privacy = PrivacyService::new(
        lost_items.clone(),
        match_scores.clone(),
        config.privacy.clone(),
        config.matching.weights.high_confidence_threshold,
    );
    let catalog_service =
        CatalogService::new(categories.clone(), locations.clone(), IdGenerator::new());
    let matching_service = MatchingService::new(
        lost_items.clone(),
        found_items.clone(),
        match_scores,
        IdGenerator::new(),
        config.matching.clone(),
    );

    let user_service = UserService::new(users.clone());
    let lost_item_service =
        LostItemService::new(lost_items.clone(), catalog_service.clone(), IdGenerator::new());
    let found_item_service = FoundItemService::new(
        found_items.clone(),
        catalog_service.clone(),
        privacy.clone(),
        matching_service.clone(),
        dispatcher.clone(),
        IdGenerator::new(),
        config.privacy.clone(),
    );
    let security_question_service = SecurityQuestionService::new(
        questions.clone(),
        found_items.clone(),
        claim_attempts.clone(),
        privacy,
        IdGenerator::new(),
    );
    let claim_service = ClaimService::new(
        claim_attempts.clone(),
        found_items.clone(),
        questions,
        users.clone(),
        IdGenerator::new(),
        dispatcher.clone(),
        config.claims.clone(),
        config.matching.weights.claim_success_threshold,
    );
    let finalize_service = FinalizeService::new(
        found_items.clone(),
        claim_attempts.clone(),
        returns.clone(),
        IdGenerator::new(),
        dispatcher.clone(),
        config.claims.clone(),
    );
    let notification_service = NotificationService::new(notifications);
    let stats_service = StatsService::new(
        found_items.clone(),
        lost_items,
        returns,
        categories,
        locations,
    );

    // Create app state
    let state = AppState {
        user_service,
        lost_item_service,
        found_item_service,
        security_question_service,
        claim_service,
        finalize_service,
        matching_service,
        notification_service,
        catalog_service,
        stats_service,
    };

    // Start the background sweeps
    let sweeper = Sweeper::new(
        found_items,
        claim_attempts,
        users,
        notification_log,
        dispatcher,
        IdGenerator::new(),
        config.claims.clone(),
    );
    run_sweeps(config.scheduler.clone(), Arc::new(sweeper)).await;

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
