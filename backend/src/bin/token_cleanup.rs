use trackproductivo_backend::{
    config::Config, db::connection::create_pool, repositories::PersonaStore,
    repositories::PgPersonaStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;

    let store = PgPersonaStore::new(pool.clone());
    let limpiados = store
        .limpiar_expirados()
        .await
        .expect("limpiar tokens de recuperación expirados");

    if limpiados > 0 {
        tracing::info!("Se limpiaron {} tokens de recuperación expirados", limpiados);
    }

    sqlx::query("VACUUM (ANALYZE) personas")
        .execute(&pool)
        .await
        .expect("vacuum tabla personas");

    Ok(())
}
