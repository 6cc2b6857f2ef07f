use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::Level;

use trc_core::{Record, ReaderConfig, TraceError, TraceStore};

#[derive(Parser)]
#[command(name = "trc", about = "Trace record reader — index + tagged data file")]
struct Cli {
    /// Data file (default: saucisse.data)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Index file (default: saucisse.index)
    #[arg(long, global = true)]
    index: Option<PathBuf>,

    /// JSON config with data_path / index_path; --data/--index override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print records as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// -v info, -vv debug, -vvv trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, default_value_t = false)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Decode the given record numbers
    Show {
        #[arg(required = true, num_args = 1..)]
        records: Vec<u32>,
        /// Exit non-zero if any record could not be read
        #[arg(long, default_value_t = false)]
        strict: bool,
    },

    /// First record, COUNT random records, last record
    Sample {
        #[arg(long, default_value_t = 13)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = false)]
        strict: bool,
    },

    /// Summarize the index
    Index {
        /// Also list every record -> offset pair
        #[arg(long, default_value_t = false)]
        entries: bool,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn resolve_config(cli: &Cli) -> Result<ReaderConfig> {
    let mut cfg = match &cli.config {
        Some(p) => ReaderConfig::load(p)?,
        None => ReaderConfig::default(),
    };
    if let Some(d) = &cli.data {
        cfg.data_path = d.clone();
    }
    if let Some(i) = &cli.index {
        cfg.index_path = i.clone();
    }
    Ok(cfg)
}

/// Demo order: first, `count` random picks from the rest, last.
fn sample_records(store: &TraceStore, count: usize, rng: &mut impl Rng) -> Vec<u32> {
    let numbers = store.index().record_numbers();
    let Some((&first, rest)) = numbers.split_first() else {
        return vec![];
    };
    let mut out = vec![first];
    if !rest.is_empty() {
        out.extend((0..count).map(|_| rest[rng.random_range(0..rest.len())]));
    }
    if let Some(&last) = rest.last() {
        out.push(last);
    }
    out
}

fn print_record(record: u32, rec: &Record, json: bool) -> Result<()> {
    if json {
        let mut v = serde_json::to_value(rec)?;
        v["record"] = record.into();
        println!("{v}");
    } else {
        println!("{rec}");
    }
    Ok(())
}

/// Prints each outcome; returns how many records failed with an I/O error.
fn report(store: &TraceStore, records: impl IntoIterator<Item = u32>, json: bool) -> Result<usize> {
    let mut failed = 0usize;
    for (n, res) in store.read_many(records) {
        match res {
            Ok(rec) => print_record(n, &rec, json)?,
            Err(TraceError::NotFound(n)) if json => {
                println!("{}", serde_json::json!({ "kind": "not_found", "record": n }));
            }
            Err(TraceError::NotFound(n)) => {
                println!("Record number {n} not found in the index.");
            }
            Err(e) => {
                failed += 1;
                let offset = store.resolve(n).unwrap_or_default();
                tracing::debug!(record = n, offset, error = %e, "decode failed");
                eprintln!("Error reading data record {n} at offset {offset}: {e}");
            }
        }
    }
    Ok(failed)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    let cfg = resolve_config(&cli)?;
    let store = TraceStore::open(&cfg)?;

    let (failed, strict) = match cli.cmd {
        Cmd::Show { records, strict } => (report(&store, records, cli.json)?, strict),
        Cmd::Sample { count, seed, strict } => {
            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_os_rng(),
            };
            let picks = sample_records(&store, count, &mut rng);
            tracing::info!(picks = picks.len(), "sampling records");
            (report(&store, picks, cli.json)?, strict)
        }
        Cmd::Index { entries } => {
            println!("Loaded index file ({})", store.len());
            if entries {
                for e in store.index().iter() {
                    println!("{} -> {}", e.record, e.offset);
                }
            }
            (0, false)
        }
    };

    if strict && failed > 0 {
        bail!("{failed} record(s) could not be read");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trc_core::fixture::capture_demo;

    #[test]
    fn sample_brackets_with_first_and_last() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::open(&capture_demo(dir.path(), 20).unwrap()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let picks = sample_records(&store, 13, &mut rng);
        assert_eq!(picks.len(), 15);
        assert_eq!(picks[0], 0);
        assert_eq!(*picks.last().unwrap(), 21);
        assert!(picks[1..14].iter().all(|&n| (1..=21).contains(&n)));
    }

    #[test]
    fn sample_small_indexes() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::open(&capture_demo(dir.path(), 0).unwrap()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let picks = sample_records(&store, 3, &mut rng);
        assert_eq!(picks, vec![0, 1, 1, 1, 1]);

        let empty = TraceStore::with_index(dir.path().join("x"), Default::default());
        assert!(sample_records(&empty, 3, &mut rng).is_empty());
    }
}
