//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use pitchgenie::{build_router, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG controla o nível; padrão info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar
    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Configuração carregada");

    let (app_state, db_pool) = AppState::new(&config).await.map_err(|e| {
        tracing::error!("🔥 Falha ao inicializar o estado da aplicação: {:?}", e);
        e
    })?;

    sqlx::migrate!().run(&db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = build_router(app_state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
