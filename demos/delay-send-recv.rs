//! Schedules jobs with random-looking delays on a delay queue and checks that each one is picked
//! up no earlier than its release time and in release order.

use chrono::Utc;
use clap::Parser;
use std::thread;
use std::time::Duration;
use waitq::{WQDelay, WQDelayQueue};

/// A delayed send-recv example
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of jobs to schedule
    #[arg(short = 'n', long, default_value = "20")]
    job_count: u32,

    /// Longest delay in milliseconds
    #[arg(short = 'm', long, default_value = "2000")]
    max_delay_ms: u64,

    /// Enable verbose logging
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    if args.verbose {
        tracing_subscriber::fmt().with_env_filter("waitq=trace").init();
    }
    if args.max_delay_ms == 0 {
        panic!("max_delay_ms must be greater than zero");
    }

    let queue = WQDelayQueue::new(None);

    println!("Scheduling {} jobs over {} ms", args.job_count, args.max_delay_ms);

    for job in 0..args.job_count {
        // scatter the delays deterministically across the window
        let delay_ms = (u64::from(job) * 7919) % args.max_delay_ms;
        queue.enqueue(WQDelay::after(
            format!("job-{job}"),
            Duration::from_millis(delay_ms),
        ));
    }
    println!("Scheduled jobs:\n{queue}");

    // every job is queued before the consumer starts, so pickups follow release order
    thread::scope(|s| {
        s.spawn(|| {
            let mut last_release = None;
            for _ in 0..args.job_count {
                let job: WQDelay<String> = queue.dequeue();
                let now = Utc::now();
                if now < job.release_at {
                    panic!("job released early: {job}");
                }
                if last_release.is_some_and(|last| last > job.release_at) {
                    panic!("job released out of order: {job}");
                }
                last_release = Some(job.release_at);

                let late = (now - job.release_at).num_milliseconds();
                println!("picked up {job} ({late} ms late)");
            }
        });
    });
}
