use anyhow::Context;

use configserver_core::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    configserver_observability::init();

    let settings = Settings::load().context("failed to load settings")?;
    let app = configserver_api::app::build_app(&settings).context("failed to build application")?;

    let listener = tokio::net::TcpListener::bind(&settings.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.server.bind))?;

    tracing::info!(
        service = %settings.server.name,
        addr = %listener.local_addr()?,
        registry = %settings.application.registry.public_url(),
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
