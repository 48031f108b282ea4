//! Basic usage example

use autoconfig::{CandidateType, Configuration, ConfigurationLoader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Configuration)]
#[configuration(key = "Server")]
struct ServerSettings {
    // Required field: loading fails if "Server.Port" is absent or 0
    #[configuration(required)]
    pub port: u16,

    // Matches "MaxConnections"; the quoted "256" is coerced to a number
    #[configuration(default = 64)]
    pub max_connections: u32,

    // Absent from the document: falls back to Default::default()
    pub debug_mode: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut loader = ConfigurationLoader::new().with_base_path(env!("CARGO_MANIFEST_DIR"));
    loader.load(
        "../demos/appsettings.json",
        &[CandidateType::configuration::<ServerSettings>()],
    )?;

    let server = loader
        .get::<ServerSettings>()?
        .ok_or_else(|| anyhow::anyhow!("ServerSettings was not bound"))?;

    println!("Configuration loaded:");
    println!("  Port: {}", server.port);
    println!("  Max Connections: {}", server.max_connections);
    println!("  Debug Mode: {}", server.debug_mode);

    Ok(())
}
