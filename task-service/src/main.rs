use std::{net::SocketAddr, sync::Arc};

use service_core::observability::logging::init_tracing;
use task_service::{
    build_router,
    config::TaskConfig,
    db::{
        InMemoryMembershipStore, InMemoryOrganizationStore, InMemoryTodoStore, InMemoryUserStore,
        MembershipStore, OrganizationStore, TodoStore, UserStore,
    },
    services::{
        AuthService, InMemoryRevocationStore, JwtService, MembershipService, OrganizationService,
        RevocationStore, TodoService,
    },
    AppState,
};
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration - fail fast if invalid
    let config = TaskConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting task service"
    );

    let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
    let orgs: Arc<dyn OrganizationStore> = Arc::new(InMemoryOrganizationStore::new());
    let memberships: Arc<dyn MembershipStore> = Arc::new(InMemoryMembershipStore::new());
    let todos: Arc<dyn TodoStore> = Arc::new(InMemoryTodoStore::new());
    let revocations: Arc<dyn RevocationStore> = Arc::new(InMemoryRevocationStore::new());

    let jwt = JwtService::new(&config.jwt)?;
    tracing::info!("JWT service initialized");

    let auth_service = AuthService::new(users.clone(), jwt.clone(), revocations);
    let org_service =
        OrganizationService::new(orgs.clone(), memberships.clone(), todos.clone());
    let membership_service = MembershipService::new(memberships.clone(), users.clone());
    let todo_service = TodoService::new(todos);

    let state = AppState {
        config: config.clone(),
        users,
        memberships,
        jwt,
        auth_service,
        org_service,
        membership_service,
        todo_service,
    };

    let app = build_router(state)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));

    let service_span = tracing::info_span!(
        "service",
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
    );
    let _guard = service_span.enter();

    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

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
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
