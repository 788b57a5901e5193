use clap::{Parser, ValueEnum};
use std::thread;
use std::time::Instant;
use waitq::{WQBacking, WQConfig};

const PATTERN: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backing {
    Ring,
    Linked,
    Heap,
}

impl From<Backing> for WQBacking {
    fn from(backing: Backing) -> WQBacking {
        match backing {
            Backing::Ring => WQBacking::Ring,
            Backing::Linked => WQBacking::Linked,
            Backing::Heap => WQBacking::Heap,
        }
    }
}

/// A simple send-recv example using one producer and one consumer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Storage behind the queue
    #[arg(short = 'b', long, value_enum, default_value = "ring")]
    backing: Backing,

    /// Queue capacity, 0 for unbounded (not allowed for ring)
    #[arg(short = 'd', long, default_value = "64")]
    queue_depth: usize,

    /// Length of messages to send and validate
    #[arg(short = 'l', long, default_value = "16")]
    msg_len: usize,

    /// Total number of messages to send
    #[arg(short = 'n', long, default_value = "100")]
    msg_count: u32,

    /// Enable verbose logging
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
}

fn message(seq: u32, len: usize) -> String {
    let offset = seq as usize % PATTERN.len();
    PATTERN.chars().cycle().skip(offset).take(len).collect()
}

fn main() {
    let args = Args::parse();
    if args.verbose {
        tracing_subscriber::fmt().with_env_filter("waitq=trace").init();
    }

    let config = WQConfig {
        capacity: Some(args.queue_depth),
        backing: args.backing.into(),
    };
    let queue = match config.build::<(u32, String)>() {
        Ok(queue) => queue,
        Err(e) => panic!("invalid queue settings: {e}"),
    };

    println!("Starting simple send test with:");
    println!("  Backing: {:?}", args.backing);
    println!("  Queue depth: {}", args.queue_depth);
    println!("  Message length: {}", args.msg_len);
    println!("  Total messages: {}", args.msg_count);

    let start_time = Instant::now();

    thread::scope(|s| {
        // Consumer thread
        s.spawn(|| {
            let mut messages_received = 0;
            while messages_received < args.msg_count {
                let (seq, msg) = queue.dequeue();
                if args.verbose {
                    println!("Received: {seq} {msg}");
                }
                if msg != message(seq, args.msg_len) {
                    panic!("Message content mismatch at message {seq}: {msg}");
                }
                messages_received += 1;
            }
            println!("Consumer finished after receiving {messages_received} messages");
        });

        // Producer thread
        s.spawn(|| {
            for seq in 0..args.msg_count {
                queue.enqueue((seq, message(seq, args.msg_len)));
            }
            println!("Producer finished after sending {} messages", args.msg_count);
        });
    });

    println!(
        "Simple send test finished in {:?} us!",
        start_time.elapsed().as_micros()
    );
}
