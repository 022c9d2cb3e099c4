//! dnsc - demo driver for the dnscache hostname cache

use anyhow::{bail, Result};
use clap::Parser;
use dnscache::{configure_capacity, configured_capacity};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Default capacity for the shared cache (exclusive range 128..1048576)
    #[arg(short, long, default_value_t = 2048)]
    capacity: usize,

    /// Resolved pair to insert, as NAME=IP (repeatable)
    #[arg(short = 'e', long = "entry", value_name = "NAME=IP")]
    entries: Vec<String>,

    /// Name to look up (repeatable)
    #[arg(short = 'r', long = "resolve", value_name = "NAME")]
    names: Vec<String>,

    /// Print the cache contents, most recently used first
    #[arg(long)]
    dump: bool,
}

fn parse_entry(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((name, ip)) if !name.is_empty() => Ok((name, ip)),
        _ => bail!("invalid entry '{}', expected NAME=IP", raw),
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let entries = if args.entries.is_empty() {
        vec![("name1", "ip1"), ("name2", "ip2")]
    } else {
        args.entries
            .iter()
            .map(|raw| parse_entry(raw))
            .collect::<Result<Vec<_>>>()?
    };
    let names = if args.names.is_empty() {
        vec!["name1".to_string()]
    } else {
        args.names
    };

    info!("Starting dnsc v{}", env!("CARGO_PKG_VERSION"));
    if !configure_capacity(args.capacity) {
        warn!(
            "Capacity {} rejected, keeping {}",
            args.capacity,
            configured_capacity()
        );
    }

    let cache = dnscache::cache();
    info!("Cache capacity: {}", cache.capacity());

    for (name, ip) in &entries {
        cache.update(name, ip);
    }
    info!("Inserted {} entries", entries.len());

    for name in &names {
        println!("{}: {}", name, cache.resolve(name));
    }

    if args.dump {
        for (name, ip) in cache.snapshot() {
            println!("  {} -> {}", name, ip);
        }
    }

    let stats = cache.stats();
    info!(
        "Cache stats: size={} hits={} misses={} evictions={} hit_ratio={:.2}",
        cache.len(),
        stats.hits(),
        stats.misses(),
        stats.evictions(),
        stats.hit_ratio()
    );

    Ok(())
}
