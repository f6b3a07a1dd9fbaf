//! Concurrent generation under the internal lock and under caller callbacks.
//!
//! Run: `cargo run --example threaded`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use maxrng_core::{LockCallbacks, RngConfig, ThreadingMode, generate_to_vec, init_threading};

const THREADS: usize = 4;
const PER_THREAD: usize = 8;

fn main() {
    env_logger::init();
    init_threading();

    // Internal: the library serializes every call.
    let config = RngConfig::fast().with_threading(ThreadingMode::Internal);
    let produced = AtomicUsize::new(0);
    std::thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..PER_THREAD {
                    if let Some(bytes) = generate_to_vec(64, &config) {
                        produced.fetch_add(bytes.len(), Ordering::Relaxed);
                    }
                }
            });
        }
    });
    println!("internal: {} bytes from {THREADS} threads", produced.load(Ordering::Relaxed));

    // External: the host owns the lock. A spin on a shared flag stands in for
    // whatever primitive the host already has.
    let held = Arc::new(Mutex::new(false));
    let entries = Arc::new(AtomicUsize::new(0));
    let (enter_flag, leave_flag, counter) = (Arc::clone(&held), Arc::clone(&held), Arc::clone(&entries));
    let callbacks = LockCallbacks::new(
        move || {
            loop {
                let mut taken = enter_flag.lock().unwrap_or_else(|p| p.into_inner());
                if !*taken {
                    *taken = true;
                    break;
                }
                drop(taken);
                std::thread::yield_now();
            }
            counter.fetch_add(1, Ordering::Relaxed);
        },
        move || {
            *leave_flag.lock().unwrap_or_else(|p| p.into_inner()) = false;
        },
    );
    let config = RngConfig::fast().with_external_lock(callbacks);
    std::thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..PER_THREAD {
                    let _ = generate_to_vec(64, &config);
                }
            });
        }
    });
    println!("external: {} critical sections entered", entries.load(Ordering::Relaxed));
}
