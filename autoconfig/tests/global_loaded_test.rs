//! Process-wide facade after a successful load

use autoconfig::{get_configuration, global, CandidateType, Configuration, LoadError};
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Debug, Configuration)]
#[configuration(key = "Database")]
struct DatabaseSettings {
    #[configuration(required)]
    pub url: String,

    #[configuration(default = 5)]
    pub pool_size: u32,
}

#[derive(Debug, Configuration)]
#[configuration(key = "Cache")]
struct CacheSettings {
    pub ttl_secs: u64,
}

fn candidates() -> [CandidateType; 1] {
    [CandidateType::configuration::<DatabaseSettings>()]
}

/// Load the process-wide configuration unless an earlier test already did.
fn ensure_loaded() {
    if global::is_loaded() {
        return;
    }
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"Database": {{"Url": "postgres://localhost/app"}}}}"#).unwrap();
    autoconfig::load(file.path(), &candidates()).unwrap();
}

#[test]
#[serial]
fn test_lookup_after_load() {
    ensure_loaded();

    let database = get_configuration::<DatabaseSettings>().unwrap().unwrap();
    assert_eq!(database.url, "postgres://localhost/app");
    assert_eq!(database.pool_size, 5);

    assert!(get_configuration::<CacheSettings>().unwrap().is_none());
    assert_eq!(global::configurations().unwrap().len(), 1);
}

#[test]
#[serial]
fn test_second_load_is_rejected() {
    ensure_loaded();

    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"Database": {{"Url": "postgres://other/app"}}}}"#).unwrap();

    let result = autoconfig::load(file.path(), &candidates());
    assert!(matches!(result, Err(LoadError::AlreadyLoaded)));

    let result = autoconfig::load(
        file.path(),
        &[CandidateType::configuration::<CacheSettings>()],
    );
    assert!(matches!(result, Err(LoadError::AlreadyLoaded)));

    let database = get_configuration::<DatabaseSettings>().unwrap().unwrap();
    assert_eq!(database.url, "postgres://localhost/app");
}

#[test]
#[serial]
fn test_concurrent_readers() {
    ensure_loaded();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            std::thread::spawn(|| {
                get_configuration::<DatabaseSettings>()
                    .unwrap()
                    .unwrap()
                    .pool_size
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 5);
    }
}
