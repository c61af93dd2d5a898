use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trackproductivo_backend::config::Config;
use trackproductivo_backend::db::connection::create_pool;
use trackproductivo_backend::repositories::PgPersonaStore;
use trackproductivo_backend::services::recuperacion::RecuperacionService;
use trackproductivo_backend::utils::email::SmtpMailer;

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trackproductivo_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        auth_secret = %mask_secret(&config.auth_secret),
        puerto = config.puerto,
        smtp_host = %config.smtp_host,
        archivos_dir = %config.archivos_dir.display(),
        novedades_dir = %config.novedades_dir.display(),
        "Configuración cargada desde el entorno/.env"
    );

    // Initialize database
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Wire the recovery service against the live store and SMTP relay
    let store = Arc::new(PgPersonaStore::new(pool.clone()));
    let mailer = Arc::new(SmtpMailer::from_config(&config)?);
    mailer.verificar_conexion().await;
    let servicio = Arc::new(RecuperacionService::new(
        store,
        mailer,
        config.auth_secret.clone(),
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.puerto));
    let app = trackproductivo_backend::app(pool, config, servicio);

    tracing::info!("Servidor escuchando en {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
