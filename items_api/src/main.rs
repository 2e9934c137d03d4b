//! Items API: serves the built-in `Item` record type, plus any entities listed in `ENTITY_CONFIG`.
//!
//! Run from repo root: `cargo run -p items-api`

use crud_services::{
    app, apply_migrations, connect, load_entities_from_path, resolve, items_entity, AppState, PoolSessions, ServiceInfo,
    Settings,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("crud_services=info,items_api=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let mut entities = vec![items_entity()];
    if let Some(path) = &settings.entity_config {
        entities.extend(load_entities_from_path(path).await?);
    }
    let model = resolve(&entities)?;

    let pool = connect(&settings).await?;
    {
        let mut conn = pool.acquire().await?;
        apply_migrations(&mut conn, &model).await?;
    }

    let state = AppState::new(
        PoolSessions::new(pool),
        model,
        ServiceInfo {
            title: "Items API".into(),
            description: "A CRUD API for managing items".into(),
        },
    );
    let router = app(state, settings.body_limit_bytes);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("Items API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
