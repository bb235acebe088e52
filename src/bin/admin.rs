//! CLI administration tool for the request cache.
//!
//! Inspects and manipulates the cache in the configured Redis database
//! without going through the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Check the connection
//! cargo run --bin admin -- ping
//!
//! # Number of cached entries
//! cargo run --bin admin -- count
//!
//! # Read, write and delete entries
//! cargo run --bin admin -- get user:42
//! cargo run --bin admin -- set user:42 '{"name":"Ada"}' --ttl 60
//! cargo run --bin admin -- delete user:42 user:43
//!
//! # Remove everything in the selected database
//! cargo run --bin admin -- flush
//! ```
//!
//! # Environment Variables
//!
//! Same Redis settings as the server: `REDIS_URL` or `REDIS_HOST`,
//! `REDIS_PORT`, `REDIS_PASSWORD`, plus `REDIS_DB` and `CACHE_MAX_AGE_MS`.

use request_cache::application::CacheHandle;
use request_cache::config;
use request_cache::infrastructure::cache::RedisStore;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use serde_json::Value;

/// CLI tool for managing the request cache.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Cache commands.
#[derive(Subcommand)]
enum Commands {
    /// Check the Redis connection
    Ping,

    /// Show the number of cached entries
    Count,

    /// Print the value stored under a key
    Get {
        key: String,
    },

    /// Store a JSON value under a key
    Set {
        key: String,

        /// JSON value (e.g., '{"value":1}')
        value: String,

        /// Expiry in seconds; without it the default max-age applies
        #[arg(short, long)]
        ttl: Option<u64>,
    },

    /// Delete one or more keys
    Delete {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Remove every entry in the selected database
    Flush {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let options = config.cache_options();

    let redis_url = options
        .connection_url()
        .context("Invalid Redis connection settings")?;
    let store = RedisStore::connect(&redis_url)
        .await
        .context("Failed to connect to Redis")?;
    let cache = CacheHandle::with_store(store, options.db, options.max_age)
        .await
        .context("Failed to select Redis database")?;

    match cli.command {
        Commands::Ping => handle_ping(&cache).await,
        Commands::Count => handle_count(&cache).await?,
        Commands::Get { key } => handle_get(&cache, &key).await?,
        Commands::Set { key, value, ttl } => handle_set(&cache, &key, &value, ttl).await?,
        Commands::Delete { keys } => handle_delete(&cache, keys).await?,
        Commands::Flush { yes } => handle_flush(&cache, yes).await?,
    }

    Ok(())
}

async fn handle_ping(cache: &CacheHandle) {
    if cache.ping().await {
        println!("{}", "Redis connection OK".green().bold());
    } else {
        println!("{}", "Redis did not answer PING".red().bold());
    }
}

async fn handle_count(cache: &CacheHandle) -> Result<()> {
    let count = cache.count().await?;
    println!(
        "  Entries: {}",
        count.to_string().bright_green().bold()
    );
    Ok(())
}

async fn handle_get(cache: &CacheHandle, key: &str) -> Result<()> {
    match cache.get::<Value>(key, true).await? {
        Some(value) => {
            println!("{}", key.cyan());
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        None => println!("{} {}", "No entry for".yellow(), key.cyan()),
    }
    Ok(())
}

/// Parses `raw` as JSON and stores it.
///
/// With `--ttl` the entry expires after that many seconds; otherwise the
/// configured default max-age (if any) applies.
async fn handle_set(cache: &CacheHandle, key: &str, raw: &str, ttl: Option<u64>) -> Result<()> {
    let value: Value = serde_json::from_str(raw).context("Value must be valid JSON")?;

    match ttl {
        Some(seconds) => cache.setex(key, seconds, &value).await?,
        None => cache.put(key, &value).await?,
    };

    println!("{} {}", "Stored".green().bold(), key.cyan());
    Ok(())
}

/// Deletes keys and prints one line per key.
async fn handle_delete(cache: &CacheHandle, keys: Vec<String>) -> Result<()> {
    for deletion in cache.delete(keys).await? {
        match deletion.outcome {
            Ok(true) => println!("  {} {}", "deleted".green(), deletion.key.cyan()),
            Ok(false) => println!("  {} {}", "absent ".bright_black(), deletion.key.cyan()),
            Err(e) => println!("  {} {}: {}", "failed ".red(), deletion.key.cyan(), e),
        }
    }
    Ok(())
}

/// Flushes the selected database after confirmation (default: No).
async fn handle_flush(cache: &CacheHandle, skip_confirm: bool) -> Result<()> {
    let count = cache.count().await?;

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} entries?", count))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    cache.flush().await?;
    println!("{}", "Cache flushed".green().bold());
    Ok(())
}
