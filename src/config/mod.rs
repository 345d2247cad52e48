// Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const PROD: &str = "prod";
#[allow(dead_code)]
pub const DEV: &str = "dev";
#[allow(dead_code)]
pub const TEST: &str = "test";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TxMapCfg {
    #[serde(rename = "txmap")]
    pub txmap: TxMapBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TxMapBox {
    pub env: String,
    pub logs: Option<Logs>,
    pub split: Option<Split>,
    #[serde(rename = "single_writer")]
    pub single_writer: Option<SingleWriter>,
    pub synced: Option<Synced>,
    pub workload: Option<Workload>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

/// Sharded hash map sizing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Split {
    pub length: usize,
    pub buckets: Option<u16>,
}

/// Sharded numeric map sizing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SingleWriter {
    pub length: usize,
    pub buckets: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Synced {
    /// Max entries; 0 = unbounded.
    #[serde(default)]
    pub limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Workload {
    pub items: usize,
    /// 0 = all cores.
    #[serde(default)]
    pub workers: usize,
}

impl Default for Workload {
    fn default() -> Self {
        Self {
            items: 100_000,
            workers: 0,
        }
    }
}

impl Workload {
    pub fn workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }
}

// Config type alias for convenience
pub type Config = TxMapCfg;

static DEFAULT_SPLIT: Split = Split {
    length: 0,
    buckets: None,
};
static DEFAULT_SINGLE_WRITER: SingleWriter = SingleWriter {
    length: 0,
    buckets: None,
};
static DEFAULT_SYNCED: Synced = Synced { limit: 0 };

impl Config {
    pub fn logs(&self) -> Option<&Logs> {
        self.txmap.logs.as_ref()
    }

    pub fn is_prod(&self) -> bool {
        self.txmap.env == PROD
    }

    #[allow(dead_code)]
    pub fn is_test(&self) -> bool {
        self.txmap.env == TEST
    }

    pub fn split(&self) -> &Split {
        self.txmap.split.as_ref().unwrap_or(&DEFAULT_SPLIT)
    }

    pub fn single_writer(&self) -> &SingleWriter {
        self.txmap
            .single_writer
            .as_ref()
            .unwrap_or(&DEFAULT_SINGLE_WRITER)
    }

    pub fn synced(&self) -> &Synced {
        self.txmap.synced.as_ref().unwrap_or(&DEFAULT_SYNCED)
    }

    pub fn workload(&self) -> Workload {
        self.txmap.workload.clone().unwrap_or_default()
    }

    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        Self::parse(&data).with_context(|| format!("unmarshal yaml from {:?}", abs_path))
    }

    /// Parses and validates a YAML document.
    pub fn parse(data: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(data)?;

        if cfg.txmap.split.as_ref().and_then(|s| s.buckets) == Some(0) {
            anyhow::bail!("split.buckets must be greater than zero");
        }
        if cfg.txmap.single_writer.as_ref().and_then(|s| s.buckets) == Some(0) {
            anyhow::bail!("single_writer.buckets must be greater than zero");
        }

        Ok(cfg)
    }
}

// Test config is always available for integration tests
mod test_config;
#[allow(dead_code)]
pub use test_config::new_test_config;
