//! Stress runners for slotdb.
//!
//! These runners drive a store from several threads at once and report
//! what happened; the assertions live in the callers.

use crate::fixtures::contractor_row;
use parking_lot::Mutex;
use slotdb_core::{CoreError, Filter, RecordId, RecordStore};
use std::collections::BTreeSet;
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
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Operations per thread.
    pub operations: usize,
    /// Number of concurrent threads.
    pub threads: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 200,
            threads: 4,
        }
    }
}

fn run_threads<F>(threads: usize, work: F) -> (usize, usize, Duration)
where
    F: Fn(usize) -> (usize, usize) + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let start = Instant::now();
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let work = Arc::clone(&work);
            thread::spawn(move || work(t))
        })
        .collect();

    let (mut ok, mut failed) = (0, 0);
    for handle in handles {
        let (o, f) = handle.join().expect("stress thread panicked");
        ok += o;
        failed += f;
    }
    (ok, failed, start.elapsed())
}

/// Creates distinct records from every thread.
///
/// Returns the result and every id handed out.
pub fn stress_concurrent_creates(
    store: &Arc<RecordStore>,
    config: &StressConfig,
) -> (StressTestResult, Vec<RecordId>) {
    let ids = Arc::new(Mutex::new(Vec::new()));
    let (ok, failed, duration) = {
        let store = Arc::clone(store);
        let ids = Arc::clone(&ids);
        let operations = config.operations;
        run_threads(config.threads, move |t| {
            let (mut ok, mut failed) = (0, 0);
            for i in 0..operations {
                match store.create(&contractor_row(t * operations + i)) {
                    Ok(id) => {
                        ids.lock().push(id);
                        ok += 1;
                    }
                    Err(_) => failed += 1,
                }
            }
            (ok, failed)
        })
    };

    let ids = ids.lock().clone();
    (StressTestResult::new(ok, failed, duration), ids)
}

/// Payload written by thread `thread` in round `round` of an update race.
pub fn race_payload(id: RecordId, thread: usize, round: usize) -> Vec<String> {
    let mut row = contractor_row(id.as_u32() as usize);
    row[2] = format!("T{thread} R{round}");
    row[3] = thread.to_string();
    row[5] = (10_000_000 + round).to_string();
    row
}

/// Has every thread update the same record `config.operations` times.
///
/// Each write is a [`race_payload`], so readers can tell a whole payload
/// from a torn one.
pub fn stress_update_race(
    store: &Arc<RecordStore>,
    id: RecordId,
    config: &StressConfig,
) -> StressTestResult {
    let store = Arc::clone(store);
    let operations = config.operations;
    let (ok, failed, duration) = run_threads(config.threads, move |t| {
        let (mut ok, mut failed) = (0, 0);
        for round in 0..operations {
            match store.update(id, &race_payload(id, t, round)) {
                Ok(()) => ok += 1,
                Err(_) => failed += 1,
            }
        }
        (ok, failed)
    });
    StressTestResult::new(ok, failed, duration)
}

/// Runs `find` in a loop while writers race on `id`.
///
/// Returns the number of observed records whose fields do not form a
/// single writer's payload. A correct store always returns 0.
pub fn stress_find_during_updates(
    store: &Arc<RecordStore>,
    id: RecordId,
    config: &StressConfig,
) -> usize {
    let writers = {
        let store = Arc::clone(store);
        let config = config.clone();
        thread::spawn(move || stress_update_race(&store, id, &config))
    };

    let field_count = store.schema().field_count();
    let mut torn = 0;
    while !writers.is_finished() {
        let records = match store.find_records(&Filter::any(field_count)) {
            Ok(records) => records,
            Err(CoreError::NoMatch) => continue,
            Err(_) => {
                torn += 1;
                continue;
            }
        };
        for record in records.iter().filter(|r| r.id() == id) {
            if !is_whole_payload(&record.trimmed_values(), id) {
                torn += 1;
            }
        }
    }
    writers.join().expect("writer thread panicked");
    torn
}

/// Returns whether `values` is the seed row of `id` or one [`race_payload`].
pub fn is_whole_payload(values: &[String], id: RecordId) -> bool {
    if values == contractor_row(id.as_u32() as usize).as_slice() {
        return true;
    }
    let Some(rest) = values.get(2).and_then(|s| s.strip_prefix('T')) else {
        return false;
    };
    let Some((thread, round)) = rest.split_once(" R") else {
        return false;
    };
    match (thread.parse::<usize>(), round.parse::<usize>()) {
        (Ok(t), Ok(r)) => values == race_payload(id, t, r).as_slice(),
        _ => false,
    }
}

/// Returns the distinct ids in `ids`.
pub fn distinct(ids: &[RecordId]) -> BTreeSet<RecordId> {
    ids.iter().copied().collect()
}
