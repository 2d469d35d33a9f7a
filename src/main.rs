use std::sync::Arc;

use errand_router::api::DynAPI;
use errand_router::config::Config;
use errand_router::engine::Engine;
use errand_router::error::Error;
use errand_router::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let engine = Arc::new(Engine::from_config(&config).await?);

    serve(engine.clone() as DynAPI, config.listen_addr).await?;

    engine.shutdown().await;

    Ok(())
}
