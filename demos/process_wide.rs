//! Example demonstrating the process-wide load-once facade

use autoconfig::{get_configuration, CandidateType, Configuration, LoadError};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Configuration)]
#[configuration(key = "Server")]
struct ServerSettings {
    #[configuration(required)]
    pub port: u16,
}

fn serve() -> anyhow::Result<()> {
    // Anywhere in the program, without passing a loader around
    let server = get_configuration::<ServerSettings>()?
        .ok_or_else(|| anyhow::anyhow!("ServerSettings was not bound"))?;
    println!("Serving on port {}", server.port);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Lookups before loading are errors, never defaults
    assert!(matches!(
        get_configuration::<ServerSettings>(),
        Err(LoadError::NotLoaded)
    ));

    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos/appsettings.json");
    let candidates = [CandidateType::configuration::<ServerSettings>()];
    autoconfig::load(&path, &candidates)?;

    // Configuration is fixed for the rest of the process
    if let Err(e) = autoconfig::load(&path, &candidates) {
        println!("Second load rejected: {}", e);
    }

    serve()
}
