//! Example demonstrating nested sections, key paths and required fields

use autoconfig::{CandidateType, Configuration, ConfigurationLoader, Converter};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Endpoint {
    host: String,
    port: u16,
}

struct EndpointConverter;

impl Converter for EndpointConverter {
    type Target = Endpoint;

    fn convert(text: &str) -> anyhow::Result<Endpoint> {
        let (host, port) = text
            .rsplit_once(':')
            .ok_or_else(|| anyhow::anyhow!("expected host:port, got '{}'", text))?;
        Ok(Endpoint {
            host: host.to_string(),
            port: port.parse()?,
        })
    }
}

#[derive(Debug, Default, Configuration)]
struct UpstreamSettings {
    #[configuration(required)]
    pub host: String,

    #[configuration(default = 443)]
    pub port: u16,
}

#[derive(Debug, Configuration)]
#[configuration(key = "Proxy")]
struct ProxySettings {
    // Bound from "Proxy.Upstream"; its required fields are validated as "upstream.host"
    #[configuration(nested)]
    pub upstream: UpstreamSettings,

    // Endpoint has no Deserialize impl; only a converter can produce it
    #[configuration(convert, name = "Fallback")]
    pub fallback_endpoint: Option<Endpoint>,
}

// ":" addresses a section inside another section
#[derive(Debug, Configuration)]
#[configuration(key = "Logging:LogLevel")]
struct LogLevels {
    #[configuration(default = "warn".to_string())]
    pub default: String,

    pub autoconfig: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut loader = ConfigurationLoader::new().with_base_path(env!("CARGO_MANIFEST_DIR"));
    loader.load(
        "../demos/appsettings.json",
        &[
            CandidateType::configuration::<ProxySettings>(),
            CandidateType::configuration::<LogLevels>(),
            CandidateType::converter::<EndpointConverter>(),
        ],
    )?;

    let proxy = loader
        .get::<ProxySettings>()?
        .ok_or_else(|| anyhow::anyhow!("ProxySettings was not bound"))?;
    println!(
        "Upstream: {}:{}",
        proxy.upstream.host, proxy.upstream.port
    );
    if let Some(fallback) = &proxy.fallback_endpoint {
        println!("Fallback: {}:{}", fallback.host, fallback.port);
    }

    let levels = loader
        .get::<LogLevels>()?
        .ok_or_else(|| anyhow::anyhow!("LogLevels was not bound"))?;
    println!("Log levels: default={} autoconfig={:?}", levels.default, levels.autoconfig);

    Ok(())
}
