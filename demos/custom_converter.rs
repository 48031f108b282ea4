//! Example demonstrating custom converters

use autoconfig::{CandidateType, Configuration, ConfigurationLoader, Converter};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// Accepts "localhost" in addition to literal addresses
struct AddressConverter;

impl Converter for AddressConverter {
    type Target = IpAddr;

    fn convert(text: &str) -> anyhow::Result<IpAddr> {
        if text.eq_ignore_ascii_case("localhost") {
            return Ok(IpAddr::V4(Ipv4Addr::LOCALHOST));
        }
        Ok(text.parse()?)
    }
}

// Parses "1500ms" / "30s"
struct DurationConverter;

impl Converter for DurationConverter {
    type Target = Duration;

    fn convert(text: &str) -> anyhow::Result<Duration> {
        if let Some(ms) = text.strip_suffix("ms") {
            return Ok(Duration::from_millis(ms.parse()?));
        }
        if let Some(secs) = text.strip_suffix('s') {
            return Ok(Duration::from_secs(secs.parse()?));
        }
        anyhow::bail!("unsupported duration '{}'", text)
    }
}

#[derive(Debug, Configuration)]
#[configuration(key = "Server")]
struct ServerSettings {
    pub port: u16,

    // IpAddr has a registered converter, so "localhost" is accepted
    #[configuration(required)]
    pub host: Option<IpAddr>,
}

#[derive(Debug, Configuration)]
#[configuration(key = "Proxy")]
struct ProxySettings {
    #[configuration(default = Duration::from_secs(5))]
    pub timeout: Duration,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut loader = ConfigurationLoader::new().with_base_path(env!("CARGO_MANIFEST_DIR"));
    let configurations = loader.load(
        "../demos/appsettings.json",
        &[
            CandidateType::configuration::<ServerSettings>(),
            CandidateType::configuration::<ProxySettings>(),
            CandidateType::converter::<AddressConverter>(),
            CandidateType::converter::<DurationConverter>(),
        ],
    )?;

    if let Some(server) = configurations.get::<ServerSettings>() {
        println!("Server listens on {:?}:{}", server.host, server.port);
    }
    if let Some(proxy) = configurations.get::<ProxySettings>() {
        println!("Proxy timeout: {:?}", proxy.timeout);
    }

    Ok(())
}
