use super::{Config, TxMapBox};

/// Creates a new test configuration.
pub fn new_test_config() -> Config {
    Config {
        txmap: TxMapBox {
            env: super::TEST.to_string(),
            logs: Some(super::Logs {
                level: Some("debug".to_string()),
            }),
            split: Some(super::Split {
                length: 10_000,
                buckets: Some(64),
            }),
            single_writer: Some(super::SingleWriter {
                length: 10_000,
                buckets: Some(32),
            }),
            synced: Some(super::Synced { limit: 1000 }),
            workload: Some(super::Workload {
                items: 10_000,
                workers: 4,
            }),
        },
    }
}
