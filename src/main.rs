//! Unsalted Hash Cracker CLI
//!
//! Usage:
//!   hash-crack -f hashes.txt --min 1 --max 5            # SHA-1 targets
//!   hash-crack -f hashes.txt --min 4 --max 6 -a sha256  # SHA-256 targets
//!   hash-crack -f hashes.txt --min 1 --max 8 -t 600     # Give up after 10 minutes

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hash_crack::{
    Config, CrackPool, CrackReport, CrackResult, PoolEvent, SearchSpace, TargetSet,
};

/// Exit status when some hashes could not be cracked.
const EXIT_INCOMPLETE: i32 = 2;

fn main() {
    let config = Config::parse();
    init_tracing(config.verbose);

    // Validate configuration
    let space = match config.validate().and_then(|()| config.search_space()) {
        Ok(space) => space,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let targets = match TargetSet::from_file(&config.file, config.algorithm) {
        Ok(targets) => targets,
        Err(e) => {
            eprintln!("Input error: {}", e);
            process::exit(1);
        }
    };

    let algorithm = targets.algorithm();
    let mut pool = match CrackPool::new(targets, space, config.crack_options()) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to start workers: {}", e);
            process::exit(1);
        }
    };

    ctrlc_handler(pool.stop_flag_clone());

    // Print startup info
    println!("Unsalted Hash Cracker");
    println!("=====================");
    println!("Algorithm:  {}", algorithm);
    println!("Targets:    {} hash(es)", pool.targets().len());
    print_space(pool.space());
    println!("Workers:    {} ({})", pool.num_workers(), config.strategy);
    if let Some(timeout) = config.timeout {
        println!("Timeout:    {}s", timeout);
    }
    println!();

    println!("Searching... (Press Ctrl+C to stop)\n");

    let mut found = 0;
    let report_interval = Duration::from_secs(config.report_interval);

    loop {
        match pool.wait_event(report_interval) {
            PoolEvent::Found(result) => {
                found += 1;
                print_result(&result, found);
            }
            PoolEvent::Idle => print_progress(&pool),
            PoolEvent::Finished => break,
        }
    }

    let report = pool.finish();
    print_summary(&report);

    if !report.is_complete() {
        process::exit(EXIT_INCOMPLETE);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_space(space: &SearchSpace) {
    println!(
        "Lengths:    {}-{} ({} candidates)",
        space.min_length(),
        space.max_length(),
        format_number(space.size())
    );
}

fn print_result(result: &CrackResult, index: usize) {
    println!("=== Match #{} ===", index);
    println!("Password:   {}", result.password);
    println!("Hash:       {}", result.digest);
    println!("Worker:     {}", result.worker_id);
    println!();
}

fn print_progress(pool: &CrackPool) {
    let tried = pool.candidates_tried();
    let rate = pool.candidates_per_second();
    let elapsed = pool.elapsed().as_secs();

    println!(
        "[{:>4}s] Tried {} candidates ({}/s), cracked {}/{}",
        elapsed,
        format_number(tried),
        format_number(rate as u64),
        pool.found_count(),
        pool.targets().len()
    );
}

fn print_summary(report: &CrackReport) {
    println!("\n--- Final Statistics ---");
    println!("Outcome:          {}", report.outcome);
    println!(
        "Hashes cracked:   {} of {}",
        report.found_count, report.total_targets
    );
    if !report.uncracked.is_empty() {
        println!(
            "{} of {} hashes remain uncracked:",
            report.uncracked.len(),
            report.total_targets
        );
        for digest in &report.uncracked {
            println!("  {}", digest);
        }
    }
    println!(
        "Candidates tried: {}",
        format_number(report.candidates_tried)
    );
    println!("Time elapsed:     {:.3}s", report.elapsed.as_secs_f64());

    let secs = report.elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        report.candidates_tried as f64 / secs
    } else {
        0.0
    };
    println!("Average speed:    {}/s", format_number(rate as u64));
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1e9)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1e6)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1e3)
    } else {
        n.to_string()
    }
}

fn ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    let result = ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    });

    if let Err(e) = result {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
    }
}
