// Main entrypoint for the txmap workload runner.

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

use txmap::config::{Config, Workload};
use txmap::{Hash, SplitMap, SplitSingleWriterMap, TxMap};

const CONFIG_PATH: &str = "cfg/txmap.cfg.yaml";
const CONFIG_PATH_LOCAL: &str = "cfg/txmap.cfg.local.yaml";

/// txmap - sharded in-memory transaction hash maps
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, value_name = "FILE")]
    cfg: Option<PathBuf>,
}

/// Loads the configuration struct from YAML file.
/// Tries local config first, then falls back to default config.
/// Returns the config together with the path it was read from.
fn load_cfg(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    if let Some(custom_path) = path {
        let cfg = Config::load(&custom_path)
            .with_context(|| format!("failed to load custom config from {:?}", custom_path))?;
        return Ok((cfg, custom_path));
    }

    // Try local config first
    let local = PathBuf::from(CONFIG_PATH_LOCAL);
    match Config::load(&local) {
        Ok(cfg) => Ok((cfg, local)),
        Err(_) => {
            let cfg = Config::load(CONFIG_PATH)
                .with_context(|| format!("failed to load config from {}", CONFIG_PATH))?;
            Ok((cfg, PathBuf::from(CONFIG_PATH)))
        }
    }
}

/// Configures structured logging based on configuration.
fn configure_logger(cfg: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let log_level = cfg
        .logs()
        .and_then(|logs| logs.level.as_ref())
        .map(|s| s.as_str())
        .unwrap_or("info");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if cfg.is_prod() {
        // Production: JSON format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        // Development: Pretty console format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

fn random_hashes(n: usize) -> Vec<Hash> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| Hash::new(rng.gen::<[u8; 32]>())).collect()
}

/// Fills a sharded hash map from `workers` threads, then looks every hash up.
fn run_split(cfg: &Config, workload: &Workload, workers: usize) {
    let m: SplitMap = SplitMap::from_config(cfg.split());
    let hashes = random_hashes(workload.items);
    let chunk = workload.items.div_ceil(workers).max(1);

    let failed = AtomicUsize::new(0);
    let started = Instant::now();
    thread::scope(|s| {
        for part in hashes.chunks(chunk) {
            let m = &m;
            let failed = &failed;
            s.spawn(move || {
                for (i, hash) in part.iter().enumerate() {
                    if m.put(*hash, i as u64).is_err() {
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });
    let fill = started.elapsed();

    let found = AtomicUsize::new(0);
    let started = Instant::now();
    thread::scope(|s| {
        for part in hashes.chunks(chunk) {
            let m = &m;
            let found = &found;
            s.spawn(move || {
                let hits = part.iter().filter(|hash| m.exists(hash)).count();
                found.fetch_add(hits, Ordering::Relaxed);
            });
        }
    });
    let lookup = started.elapsed();

    let failed = failed.into_inner();
    if failed > 0 {
        warn!(
            component = "workload",
            event = "split_put_failed",
            failed,
            "some puts were rejected as duplicates"
        );
    }

    info!(
        component = "workload",
        event = "split_done",
        items = workload.items,
        workers,
        buckets = m.buckets(),
        length = m.length(),
        found = found.into_inner(),
        fill_ms = fill.as_millis() as u64,
        lookup_ms = lookup.as_millis() as u64,
        "split map workload finished"
    );
}

/// Fills a single-writer sharded map with each worker owning a disjoint run
/// of buckets.
fn run_single_writer(cfg: &Config, workload: &Workload, workers: usize) {
    let mut m: SplitSingleWriterMap = SplitSingleWriterMap::from_config(cfg.single_writer());
    let buckets = m.buckets() as usize;
    let items = workload.items as u64;
    let per_worker = buckets.div_ceil(workers).max(1);

    let rejected = AtomicUsize::new(0);
    let started = Instant::now();
    let mut writers = m.buckets_mut();
    thread::scope(|s| {
        for part in writers.chunks_mut(per_worker) {
            let rejected = &rejected;
            s.spawn(move || {
                for writer in part.iter_mut() {
                    let mut key = writer.bucket();
                    while key < items {
                        if writer.put(key, key).is_err() {
                            rejected.fetch_add(1, Ordering::Relaxed);
                        }
                        key += buckets as u64;
                    }
                }
            });
        }
    });
    drop(writers);
    let fill = started.elapsed();

    let started = Instant::now();
    let found = (0..items).filter(|&key| m.get(key) == Some(key)).count();
    let lookup = started.elapsed();

    let rejected = rejected.into_inner();
    if rejected > 0 {
        warn!(
            component = "workload",
            event = "single_writer_put_failed",
            rejected,
            "some puts were rejected by their bucket"
        );
    }

    info!(
        component = "workload",
        event = "single_writer_done",
        items = workload.items,
        workers,
        buckets,
        length = m.length(),
        found,
        fill_ms = fill.as_millis() as u64,
        lookup_ms = lookup.as_millis() as u64,
        "single-writer map workload finished"
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (cfg, cfg_path) = load_cfg(args.cfg)?;

    // Configure logger (must be done after config is loaded)
    configure_logger(&cfg);
    info!(
        component = "config",
        event = "load_success",
        path = ?cfg_path,
        "config loaded"
    );

    let workload = cfg.workload();
    let workers = workload.workers();
    info!(
        component = "main",
        event = "workload_start",
        items = workload.items,
        workers,
        "starting workload"
    );

    run_split(&cfg, &workload, workers);
    run_single_writer(&cfg, &workload, workers);

    Ok(())
}
