// Option<T> fields default to None, so an explicit default is redundant
#![allow(dead_code)]

use autoconfig::Configuration;

#[derive(Configuration)]
#[configuration(key = "Server")]
struct ServerSettings {
    #[configuration(default = "127.0.0.1".to_string())]
    host: Option<String>,
}

fn main() {}
