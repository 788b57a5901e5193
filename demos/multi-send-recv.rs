//! A multi-producer, multi-consumer send-recv example over a queue described by TOML settings.
//!
//! Consumers stop once they have been idle for the drain timeout after producers finish, then
//! every sent id is checked to have arrived exactly once.

use clap::Parser;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use waitq::WQConfig;

/// A multi-producer, multi-consumer send-recv example
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML file with `backing` and `capacity` keys
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Total number of messages to send
    #[arg(short = 'n', long, default_value = "10000")]
    msg_count: u32,

    /// Number of producer threads
    #[arg(short = 'p', long, default_value = "2")]
    producer_threads: u16,

    /// Number of consumer threads
    #[arg(short = 'c', long, default_value = "2")]
    consumer_threads: u16,

    /// How long an idle consumer waits before checking whether producers are done
    #[arg(long, default_value = "50")]
    drain_timeout_ms: u64,

    /// Enable verbose logging
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
}

fn warn_for_thread_counts(args: &Args) {
    let available_cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let total_threads = args.producer_threads as usize + args.consumer_threads as usize;

    if total_threads > available_cpus {
        eprintln!(
            "Warning: total thread count ({total_threads}) exceeds available CPUs ({available_cpus})",
        );
    }
}

fn load_config(args: &Args) -> WQConfig {
    let Some(path) = &args.config else {
        return WQConfig {
            capacity: Some(64),
            ..WQConfig::default()
        };
    };

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => panic!("couldn't read {}: {e}", path.display()),
    };
    match WQConfig::from_toml_str(&text) {
        Ok(config) => config,
        Err(e) => panic!("bad config in {}: {e}", path.display()),
    }
}

fn main() {
    let args = Args::parse();
    if args.verbose {
        tracing_subscriber::fmt().with_env_filter("waitq=debug").init();
    }
    warn_for_thread_counts(&args);

    if args.producer_threads == 0 || args.consumer_threads == 0 {
        panic!("producer_threads and consumer_threads must be greater than zero");
    }

    let config = load_config(&args);
    let queue = match config.build::<u32>() {
        Ok(queue) => queue,
        Err(e) => panic!("invalid queue settings: {e}"),
    };

    println!("Starting multi send test with:");
    println!("  Queue: {:?}", queue);
    println!("  Total messages: {}", args.msg_count);
    println!("  Producer threads: {}", args.producer_threads);
    println!("  Consumer threads: {}", args.consumer_threads);

    let next_id = AtomicU32::new(0);
    let producers_done = AtomicBool::new(false);
    let received = Mutex::new(HashSet::new());
    let drain_timeout = Duration::from_millis(args.drain_timeout_ms);
    let start_time = Instant::now();

    thread::scope(|s| {
        for i in 0..args.consumer_threads {
            let builder = thread::Builder::new().name(format!("consumer_{i}"));
            let (queue, received, producers_done) = (&queue, &received, &producers_done);
            builder
                .spawn_scoped(s, move || {
                    let mut local = 0u32;
                    loop {
                        match queue.dequeue_timeout(drain_timeout) {
                            Some(id) => {
                                if !received.lock().unwrap().insert(id) {
                                    panic!("consumer_{i} received duplicate id {id}");
                                }
                                local += 1;
                            }
                            None if producers_done.load(Ordering::Acquire) => break,
                            None => {}
                        }
                    }
                    println!("consumer_{i} finished after receiving {local} messages");
                })
                .unwrap();
        }

        let producers: Vec<_> = (0..args.producer_threads)
            .map(|i| {
                let builder = thread::Builder::new().name(format!("producer_{i}"));
                let (queue, next_id) = (&queue, &next_id);
                builder
                    .spawn_scoped(s, move || {
                        let mut local = 0u32;
                        loop {
                            let id = next_id.fetch_add(1, Ordering::Relaxed);
                            if id >= args.msg_count {
                                break;
                            }
                            queue.enqueue(id);
                            local += 1;
                        }
                        println!("producer_{i} finished after sending {local} messages");
                    })
                    .unwrap()
            })
            .collect();

        for producer in producers {
            producer.join().expect("producer panicked");
        }
        producers_done.store(true, Ordering::Release);
    });

    let received = received.into_inner().unwrap();
    assert_eq!(received.len(), args.msg_count as usize, "lost messages");
    println!(
        "Multi send test finished in {:?} us!",
        start_time.elapsed().as_micros()
    );
}
