//! Stress tests for BoxDB.
//!
//! These helpers drive a store under heavy load and concurrent access.

use crate::entities::TestPerson;
use boxdb_core::{EntityBox, Id, Store, StoreError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of operations to perform.
    pub operations: usize,
    /// Number of concurrent threads (for concurrent tests).
    pub threads: usize,
    /// Number of distinct entities.
    pub entity_count: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 10_000,
            threads: 4,
            entity_count: 1_000,
        }
    }
}

fn tally<T>(result: Result<T, StoreError>, successful: &mut usize, failed: &mut usize) {
    match result {
        Ok(_) => *successful += 1,
        Err(_) => *failed += 1,
    }
}

fn populate(people: &EntityBox<TestPerson>, count: usize) -> Vec<Id<TestPerson>> {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    let mut batch = TestPerson::batch("person ", count);
    people.put_many(&mut batch).unwrap_or_default()
}

/// Run a sequential put stress test; each put is its own transaction.
pub fn stress_sequential_puts(store: &Store, config: &StressConfig) -> StressTestResult {
    let people = match store.box_for::<TestPerson>() {
        Ok(people) => people,
        Err(_) => return StressTestResult::new(0, config.operations, Duration::ZERO),
    };

    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        let mut person = TestPerson::new(format!("person {i}"), (i % 100) as u32);
        tally(people.put(&mut person), &mut successful, &mut failed);
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run a sequential get stress test over a pre-populated box.
pub fn stress_sequential_gets(store: &Store, config: &StressConfig) -> StressTestResult {
    let people = match store.box_for::<TestPerson>() {
        Ok(people) => people,
        Err(_) => return StressTestResult::new(0, config.operations, Duration::ZERO),
    };
    let ids = populate(&people, config.entity_count);
    if ids.is_empty() {
        return StressTestResult::new(0, config.operations, Duration::ZERO);
    }

    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        match people.get(ids[i % ids.len()]) {
            Ok(Some(_)) => successful += 1,
            Ok(None) | Err(_) => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run a mixed put/get/remove stress test.
pub fn stress_mixed_operations(store: &Store, config: &StressConfig) -> StressTestResult {
    let people = match store.box_for::<TestPerson>() {
        Ok(people) => people,
        Err(_) => return StressTestResult::new(0, config.operations, Duration::ZERO),
    };
    let mut ids = populate(&people, config.entity_count);

    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        match i % 3 {
            0 => {
                let mut person = TestPerson::new(format!("mixed {i}"), 1);
                let result = people.put(&mut person);
                if let Ok(id) = result {
                    ids.push(id);
                }
                tally(result, &mut successful, &mut failed);
            }
            1 => {
                let id = ids.get(i % ids.len().max(1)).copied().unwrap_or_default();
                tally(people.get(id), &mut successful, &mut failed);
            }
            _ => {
                let id = ids.pop().unwrap_or_default();
                tally(people.remove(id), &mut successful, &mut failed);
            }
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run concurrent readers over a pre-populated box.
pub fn stress_concurrent_reads(store: &Store, config: &StressConfig) -> StressTestResult {
    let people = match store.box_for::<TestPerson>() {
        Ok(people) => people,
        Err(_) => return StressTestResult::new(0, config.operations, Duration::ZERO),
    };
    let ids = Arc::new(populate(&people, config.entity_count));
    if ids.is_empty() {
        return StressTestResult::new(0, config.operations, Duration::ZERO);
    }

    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let ops_per_thread = config.operations / config.threads.max(1);

    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let people = people.clone();
            let ids = Arc::clone(&ids);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);

            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let id = ids[(t * ops_per_thread + i) % ids.len()];
                    match people.get(id) {
                        Ok(Some(_)) => {
                            successful.fetch_add(1, Ordering::Relaxed);
                        }
                        Ok(None) | Err(_) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Run concurrent writers; each write transaction waits for the active one.
pub fn stress_concurrent_writes(store: &Store, config: &StressConfig) -> StressTestResult {
    let people = match store.box_for::<TestPerson>() {
        Ok(people) => people,
        Err(_) => return StressTestResult::new(0, config.operations, Duration::ZERO),
    };

    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let ops_per_thread = config.operations / config.threads.max(1);

    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let people = people.clone();
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);

            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let mut person = TestPerson::new(format!("writer {t} #{i}"), t as u32);
                    match people.put(&mut person) {
                        Ok(_) => {
                            successful.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(_) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Run a transaction abort stress test; every other transaction fails.
pub fn stress_transaction_aborts(store: &Store, config: &StressConfig) -> StressTestResult {
    let people = match store.box_for::<TestPerson>() {
        Ok(people) => people,
        Err(_) => return StressTestResult::new(0, config.operations, Duration::ZERO),
    };

    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        let should_fail = i % 2 == 0;

        let result = store.run_in_transaction(|txn| {
            people.put_in_txn(txn, &mut TestPerson::new(format!("abort {i}"), 0))?;
            if should_fail {
                Err(StoreError::invalid_operation("intentional"))
            } else {
                Ok(())
            }
        });
        tally(result, &mut successful, &mut failed);
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run a large transaction stress test; entities are put in batches of 100.
pub fn stress_large_transactions(store: &Store, config: &StressConfig) -> StressTestResult {
    let people = match store.box_for::<TestPerson>() {
        Ok(people) => people,
        Err(_) => return StressTestResult::new(0, config.operations, Duration::ZERO),
    };
    let batch_size = 100;

    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for batch in 0..(config.operations / batch_size) {
        let mut people_batch = TestPerson::batch(&format!("batch {batch} #"), batch_size as u32);
        match people.put_many(&mut people_batch) {
            Ok(_) => successful += batch_size,
            Err(_) => failed += batch_size,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}
