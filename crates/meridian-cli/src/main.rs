//! `meridian` — inspect and exercise a consistent hashing ring.
//!
//! # Usage
//!
//! ```text
//! meridian demo                                   # classic 3-server walkthrough
//! meridian -n server1 -n server2 lookup user123   # who owns a key
//! meridian -c meridian.toml distribution          # vnodes and key share per node
//! meridian -c meridian.toml churn --add server4   # how many keys a change moves
//! ```

mod config;

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use meridian_ring::{Ring, Snapshot};
use tracing::{debug, info};

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "meridian", version, about = "Consistent hashing ring inspector")]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override vnodes per node.
    #[arg(short, long, global = true, env = "MERIDIAN_REPLICAS")]
    replicas: Option<u32>,

    /// Node to place on the ring (repeatable). Replaces `[ring] nodes`.
    #[arg(short, long = "node", global = true)]
    nodes: Vec<String>,

    /// Override the synthetic key sample size.
    #[arg(short = 'k', long = "keys", global = true)]
    sample_keys: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through adding three servers, looking up keys and removing one.
    Demo,

    /// Print the node that owns each key.
    Lookup {
        /// Keys to look up.
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Print every vnode position and each node's share of the key sample.
    Distribution,

    /// Apply membership changes and report which sample keys move.
    Churn {
        /// Node to add (repeatable).
        #[arg(long)]
        add: Vec<String>,

        /// Node to remove (repeatable).
        #[arg(long)]
        remove: Vec<String>,
    },
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;

    setup_tracing(&config.log.level);

    let mut out = io::stdout().lock();
    run(cli, config, &mut out)
}

/// Apply CLI overrides to the loaded config and dispatch the subcommand.
fn run(cli: Cli, mut config: CliConfig, out: &mut impl Write) -> Result<()> {
    // CLI args override config file values.
    if let Some(replicas) = cli.replicas {
        config.ring.replicas = Some(replicas);
    }
    if !cli.nodes.is_empty() {
        config.ring.nodes = cli.nodes;
    }
    if let Some(keys) = cli.sample_keys {
        config.sample.keys = Some(keys);
    }

    match cli.command {
        Commands::Demo => cmd_demo(out),
        Commands::Lookup { keys } => cmd_lookup(&build_ring(&config), &keys, out),
        Commands::Distribution => cmd_distribution(&build_ring(&config), &config, out),
        Commands::Churn { add, remove } => {
            cmd_churn(&build_ring(&config), &config, &add, &remove, out)
        }
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses the config value.
/// Logs go to stderr so command output stays clean.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Build a ring from the configured replica count and nodes.
fn build_ring(config: &CliConfig) -> Ring {
    let ring = Ring::new(config.replicas());
    for node in &config.ring.nodes {
        ring.add_node(node.as_str());
    }
    info!(
        replicas = ring.replica_factor(),
        nodes = ring.node_count(),
        vnodes = ring.position_count(),
        "ring built"
    );
    ring
}

// -----------------------------------------------------------------------
// meridian demo
// -----------------------------------------------------------------------

const DEMO_REPLICAS: u32 = 3;
const DEMO_NODES: [&str; 3] = ["server1", "server2", "server3"];
const DEMO_KEYS: [&str; 3] = ["user123", "product456", "order789"];

fn cmd_demo(out: &mut impl Write) -> Result<()> {
    let ring = Ring::new(DEMO_REPLICAS);
    for node in DEMO_NODES {
        ring.add_node(node);
    }

    write!(out, "{ring}")?;

    for key in DEMO_KEYS {
        write_lookup(&ring, key, out)?;
    }

    ring.remove_node("server2");
    writeln!(out)?;
    writeln!(out, "After removing server2:")?;
    write!(out, "{ring}")?;
    Ok(())
}

// -----------------------------------------------------------------------
// meridian lookup
// -----------------------------------------------------------------------

fn cmd_lookup(ring: &Ring, keys: &[String], out: &mut impl Write) -> Result<()> {
    for key in keys {
        write_lookup(ring, key, out)?;
    }
    Ok(())
}

fn write_lookup(ring: &Ring, key: &str, out: &mut impl Write) -> Result<()> {
    let node = ring.get_node(key);
    debug!(key, node = ?node, "lookup");
    writeln!(
        out,
        "Key: {key} -> Node: {}",
        node.as_deref().unwrap_or("<none>")
    )?;
    Ok(())
}

// -----------------------------------------------------------------------
// meridian distribution
// -----------------------------------------------------------------------

fn cmd_distribution(ring: &Ring, config: &CliConfig, out: &mut impl Write) -> Result<()> {
    write!(out, "{ring}")?;

    let sample = config.sample();
    let snapshot = ring.snapshot(sample.iter().map(String::as_str));
    let load = snapshot.load();

    writeln!(out)?;
    writeln!(out, "Key share over {} sample keys:", snapshot.len())?;
    for node_id in ring.node_ids() {
        let count = load.get(&node_id).copied().unwrap_or(0);
        writeln!(
            out,
            "  {node_id}: {count} ({:.1}%)",
            percent(count, snapshot.len())
        )?;
    }
    Ok(())
}

// -----------------------------------------------------------------------
// meridian churn
// -----------------------------------------------------------------------

fn cmd_churn(
    ring: &Ring,
    config: &CliConfig,
    add: &[String],
    remove: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let sample = config.sample();
    let before = ring.snapshot(sample.iter().map(String::as_str));

    for node in remove {
        ring.remove_node(node);
    }
    for node in add {
        ring.add_node(node.as_str());
    }

    let after = ring.snapshot(sample.iter().map(String::as_str));
    write_churn_report(&before, &after, out)
}

fn write_churn_report(before: &Snapshot, after: &Snapshot, out: &mut impl Write) -> Result<()> {
    let moved = before.reassignments(after);
    info!(moved = moved.len(), sampled = before.len(), "churn computed");

    writeln!(
        out,
        "Moved {} of {} sample keys ({:.1}%)",
        moved.len(),
        before.len(),
        percent(moved.len(), before.len())
    )?;

    let mut flows = BTreeMap::<(String, String), usize>::new();
    for m in &moved {
        let from = m.from.clone().unwrap_or_else(|| "<none>".to_string());
        let to = m.to.clone().unwrap_or_else(|| "<none>".to_string());
        *flows.entry((from, to)).or_insert(0) += 1;
    }
    for ((from, to), count) in flows {
        writeln!(out, "  {from} -> {to}: {count}")?;
    }
    Ok(())
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / total as f64
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
