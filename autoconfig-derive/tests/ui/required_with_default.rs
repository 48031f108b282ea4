// Required fields must come from the document, so a default value is contradictory
#![allow(dead_code)]

use autoconfig::Configuration;

#[derive(Configuration)]
#[configuration(key = "Server")]
struct ServerSettings {
    #[configuration(required, default = 8080)]
    port: u16,
}

fn main() {}
