use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use clap::Parser;
use clap::ValueEnum;
use probe_table::HashTable;
use probe_table::ProbeStrategy;
use probe_table::TableConfig;
use probe_table::config::NO_GROW;
use probe_table::config::NO_SHRINK;
use probe_table::hash_table::Entry;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Linear,
    Quadratic,
    Double,
}

impl From<Strategy> for ProbeStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Linear => ProbeStrategy::Linear,
            Strategy::Quadratic => ProbeStrategy::Quadratic,
            Strategy::Double => ProbeStrategy::DoubleHashing,
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    #[arg(short = 's', long = "strategy", value_enum, default_value_t = Strategy::Linear)]
    strategy: Strategy,

    /// Fraction of the capacity to fill, in (0, 1].
    #[arg(short = 'f', long = "fill", default_value_t = 0.9)]
    fill: f64,

    /// Fraction of the inserted values to remove again.
    #[arg(short = 'r', long = "remove", default_value_t = 0.25)]
    remove: f64,

    /// Grow the table past this load factor instead of filling a fixed table.
    #[arg(long = "max_load")]
    max_load: Option<f64>,

    /// Shrink the table below this load factor.
    #[arg(long = "min_load")]
    min_load: Option<f64>,
}

fn hash_u64(value: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn main() {
    let args = Args::parse();

    let config = TableConfig::new(args.target_capacity, args.strategy.into())
        .with_max_load_factor(args.max_load.unwrap_or(NO_GROW))
        .with_min_load_factor(args.min_load.unwrap_or(NO_SHRINK));

    println!(
        "Creating {:?} HashTable with target capacity: {}",
        config.strategy, args.target_capacity
    );

    let mut table: HashTable<u64> = match HashTable::with_config(config) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    println!("Actual capacity: {}", table.capacity());
    println!("Filling table with u64 values...");

    let num_values = (table.capacity() as f64 * args.fill.clamp(0.0, 1.0)) as usize;
    let mut inserted = Vec::with_capacity(num_values);
    let mut num_refused = 0;
    for i in 0..num_values {
        let value = i as u64;
        let hash = hash_u64(value);

        match table.entry(hash, |&v| v == value) {
            Entry::Vacant(entry) => match entry.insert(value) {
                Ok(true) => inserted.push(value),
                Ok(false) => num_refused += 1,
                Err(err) => {
                    println!("Stopped after {} values: {err}", inserted.len());
                    break;
                }
            },
            Entry::Occupied(_) => {
                panic!("Value already exists in table: {}", value);
            }
        }
    }

    println!("Inserted {} values into table", table.len());
    println!(
        "Number of refused inserts: {} ({:.02}%)",
        num_refused,
        num_refused as f64 / num_values.max(1) as f64 * 100.0
    );
    table.debug_stats().print();

    let num_removals = (inserted.len() as f64 * args.remove.clamp(0.0, 1.0)) as usize;
    for &value in inserted.iter().take(num_removals) {
        if let Err(err) = table.remove(hash_u64(value), |&v| v == value) {
            println!("Stopped removing: {err}");
            break;
        }
    }

    println!();
    println!("Removed {} values", num_removals);
    println!("Capacity after removals: {}", table.capacity());
    table.debug_stats().print();
}
