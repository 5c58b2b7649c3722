//! Backend entry-point: loads settings, initialises logging, and runs the
//! HTTP server.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::server::{self, Settings};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::from_env().map_err(std::io::Error::other)?;
    server::run(settings).await
}
