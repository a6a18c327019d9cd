use anyhow::Result;
use std::{net::SocketAddr, sync::Arc};
use tanzaku_core::application::{
    ports::{
        security::{PasswordHasher, TokenManager},
        time::Clock,
        util::SlugGenerator,
    },
    services::ApplicationServices,
};
use tanzaku_core::config::AppConfig;
use tanzaku_core::domain::{
    category::CategoryRepository,
    comment::CommentRepository,
    post::{PostReadRepository, PostWriteRepository},
    reaction::ReactionRepository,
    slugs::SlugIndex,
    user::UserRepository,
};
use tanzaku_core::infrastructure::{
    database,
    repositories::{
        PostgresCategoryRepository, PostgresCommentRepository, PostgresPostReadRepository,
        PostgresPostWriteRepository, PostgresReactionRepository, PostgresUserRepository,
    },
    security::{password::Argon2PasswordHasher, token::JwtTokenManager},
    time::SystemClock,
    util::DefaultSlugGenerator,
};
use tanzaku_core::presentation::http::{routes::build_router, state::HttpState};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url()).await?;
    database::run_migrations(&pool).await?;

    let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));

    let category_repo_impl = Arc::new(PostgresCategoryRepository::new(pool.clone()));
    let category_repo: Arc<dyn CategoryRepository> = category_repo_impl.clone();
    let category_slug_index: Arc<dyn SlugIndex> = category_repo_impl;

    let post_read_impl = Arc::new(PostgresPostReadRepository::new(pool.clone()));
    let post_read_repo: Arc<dyn PostReadRepository> = post_read_impl.clone();
    let post_slug_index: Arc<dyn SlugIndex> = post_read_impl;
    let post_write_repo: Arc<dyn PostWriteRepository> =
        Arc::new(PostgresPostWriteRepository::new(pool.clone()));

    let comment_repo: Arc<dyn CommentRepository> =
        Arc::new(PostgresCommentRepository::new(pool.clone()));
    let reaction_repo: Arc<dyn ReactionRepository> =
        Arc::new(PostgresReactionRepository::new(pool.clone()));

    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::default());
    let token_manager: Arc<dyn TokenManager> = Arc::new(JwtTokenManager::new(
        config.jwt_secret(),
        config.access_token_ttl(),
        config.refresh_token_ttl(),
    ));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::default());
    let slugger: Arc<dyn SlugGenerator> = Arc::new(DefaultSlugGenerator::default());

    let services = Arc::new(ApplicationServices::new(
        user_repo,
        category_repo,
        category_slug_index,
        post_write_repo,
        post_read_repo,
        post_slug_index,
        comment_repo,
        reaction_repo,
        password_hasher,
        token_manager,
        clock,
        slugger,
    ));

    let state = HttpState { services };
    let app = build_router(state, config.allowed_origins());

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
