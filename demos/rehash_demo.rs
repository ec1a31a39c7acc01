use std::sync::Arc;

use clap::Parser;
use primap::Method;
use primap::PrimitiveMap;
use primap::TableConfig;
use primap::compress::Compressible;
use primap::progress::LogProgress;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "entries", default_value_t = 100_000)]
    entries: i64,

    #[arg(short = 'c', long = "initial_capacity", default_value_t = 1_000)]
    initial_capacity: usize,

    #[arg(short = 'o', long = "occupancy", default_value_t = 70)]
    occupancy: u8,

    /// Report progress for rehashes of tables larger than this.
    #[arg(short = 'p', long = "progress_threshold", default_value_t = 50_000)]
    progress_threshold: usize,

    /// Remove every n-th entry after filling, leaving tombstones behind.
    #[arg(short = 'r', long = "remove_every", default_value_t = 3)]
    remove_every: i64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    let args = Args::parse();

    let config = TableConfig::<i64, i64>::new()
        .name("rehash-demo")
        .initial_capacity(args.initial_capacity)
        .maximum_occupancy(args.occupancy)
        .large_rehash_threshold(args.progress_threshold)
        .progress(Arc::new(LogProgress));
    let mut map = match PrimitiveMap::with_config(config) {
        Ok(map) => map,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    println!(
        "Created map with initial capacity {} (threshold {})",
        map.capacity(),
        map.hashing_strategy().rehash_threshold()
    );

    for key in 1..=args.entries {
        map.put(key, key * 2);
    }
    println!("Inserted {} entries, capacity {}", map.len(), map.capacity());

    if args.remove_every > 0 {
        for key in (1..=args.entries).step_by(args.remove_every as usize) {
            map.remove(key);
        }
        println!("Removed every {}th entry, {} left", args.remove_every, map.len());
    }

    print_histogram(&map.probe_histogram());
    map.debug_stats().print();

    map.compress(Method::Resize);
    println!("\nAfter resize:");
    map.debug_stats().print();

    map.compress(Method::Freeze);
    println!("\nAfter freeze: {} slots for {} entries", map.capacity(), map.len());
    let found = (1..=args.entries)
        .filter(|&key| map.find(key) == Some(key * 2))
        .count();
    println!("Entries found after freeze: {found} of {}", map.len());
}

fn print_histogram(histogram: &[usize]) {
    println!("Probe length histogram:");
    let total: usize = histogram.iter().sum();
    for (distance, &count) in histogram.iter().enumerate() {
        if count == 0 {
            continue;
        }
        println!(
            "  {distance:>4}: {count:>8} ({:.02}%)",
            count as f64 / total as f64 * 100.0
        );
    }
}
