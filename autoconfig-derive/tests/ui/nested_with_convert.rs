// A nested section is bound field by field, never through a converter
#![allow(dead_code)]

use autoconfig::Configuration;

#[derive(Configuration)]
#[configuration(key = "Proxy")]
struct ProxySettings {
    #[configuration(nested, convert)]
    upstream: UpstreamSettings,
}

#[derive(Default, Configuration)]
struct UpstreamSettings {
    port: u16,
}

fn main() {}
