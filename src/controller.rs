//! Controls the execution of a mapreduce instance.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use scoped_threadpool::Pool;
use threadpool::ThreadPool;

use crate::error::{MRError, Result};
use crate::mapreducer::{FlightCounter, Mapper, Reducer};
use crate::max_extract::find_max;
use crate::parameters::MRParameters;
use crate::partition::{self, Partition};
use crate::record_types::{Flight, GlobalResult, MaxFlights, PartialResult};

/// What a single map unit reports back to the controller.
enum UnitOutcome {
    Done(PartialResult),
    Cancelled,
    Panicked(String),
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        String::from("panicked")
    }
}

fn run_unit<M: Mapper>(mapper: &M, part: &Partition, cancel: &AtomicBool) -> UnitOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| mapper.map(part, cancel))) {
        Ok(Some(result)) => UnitOutcome::Done(result),
        Ok(None) => UnitOutcome::Cancelled,
        Err(payload) => UnitOutcome::Panicked(panic_message(payload)),
    }
}

/// Gathers the reports of all map units of one run.
struct Collector {
    outputs: Vec<Option<PartialResult>>,
    failures: Vec<(usize, String)>,
    timed_out: bool,
}

impl Collector {
    fn new(units: usize) -> Collector {
        Collector {
            outputs: (0..units).map(|_| None).collect(),
            failures: Vec::new(),
            timed_out: false,
        }
    }

    /// Receives reports until every unit has reported or `deadline` has passed.
    fn collect(&mut self, recv: &Receiver<(usize, UnitOutcome)>, deadline: Option<Instant>) {
        let mut received = 0;

        while received < self.outputs.len() {
            let msg = match deadline {
                None => recv.recv().map_err(|_| RecvTimeoutError::Disconnected),
                Some(d) => recv.recv_timeout(d.saturating_duration_since(Instant::now())),
            };

            match msg {
                Ok((i, UnitOutcome::Done(result))) => {
                    debug!("map unit {} delivered {} keys", i, result.len());
                    self.outputs[i] = Some(result);
                }
                Ok((i, UnitOutcome::Cancelled)) => self.failures.push((i, String::from("cancelled"))),
                Ok((i, UnitOutcome::Panicked(reason))) => {
                    warn!("map unit {} {}", i, reason);
                    self.failures.push((i, reason));
                }
                Err(RecvTimeoutError::Timeout) => {
                    self.timed_out = true;
                    return;
                }
                Err(RecvTimeoutError::Disconnected) => return,
            }
            received += 1;
        }
    }

    fn finish(mut self, timeout: Option<Duration>) -> Result<Vec<PartialResult>> {
        if self.timed_out {
            let missing: Vec<usize> = self
                .outputs
                .iter()
                .enumerate()
                .filter(|(_, o)| o.is_none())
                .map(|(i, _)| i)
                .collect();
            return Err(MRError::WorkerFailure {
                partition: missing.first().copied().unwrap_or(0),
                failed: missing.len(),
                reason: format!("map phase timed out after {:?}", timeout.unwrap_or_default()),
            });
        }

        // A unit that never reported counts as failed too.
        for (i, o) in self.outputs.iter().enumerate() {
            if o.is_none() && !self.failures.iter().any(|(f, _)| *f == i) {
                self.failures.push((i, String::from("exited without a result")));
            }
        }

        if !self.failures.is_empty() {
            self.failures.sort_by_key(|(i, _)| *i);
            let failed = self.failures.len();
            let (partition, reason) = self.failures.swap_remove(0);
            return Err(MRError::WorkerFailure {
                partition,
                failed,
                reason,
            });
        }

        Ok(self.outputs.into_iter().flatten().collect())
    }
}

/// Runs `mapper` over every partition concurrently and returns the partial results in
/// partition order. Each partition is moved into the unit that maps it.
///
/// At most `params.worker_count()` units run at the same time. Without a map timeout the
/// call returns only after all units have stopped; if any unit panics, the remaining units
/// still run to completion and the lowest-indexed failure is returned.
///
/// With a map timeout, units run on detached workers. When the timeout expires, outstanding
/// units are asked to stop and the call fails right away, without waiting for them; a unit
/// that ignores the request keeps running in the background until it returns.
pub fn run<M: Mapper + 'static>(
    mapper: &Arc<M>,
    params: &MRParameters,
    partitions: Vec<Partition>,
) -> Result<Vec<PartialResult>> {
    params.validate()?;
    if partitions.is_empty() {
        return Ok(Vec::new());
    }

    let workers = params.worker_count(partitions.len());
    info!("map phase: {} partitions on {} workers", partitions.len(), workers);

    let start = Instant::now();
    let cancel = Arc::new(AtomicBool::new(false));
    let mut collector = Collector::new(partitions.len());
    let (send, recv) = channel();

    match params.map_timeout {
        None => {
            let mut pool = Pool::new(workers as u32);

            pool.scoped(|scope| {
                for (i, part) in partitions.into_iter().enumerate() {
                    let done = send.clone();
                    let cancel = &*cancel;
                    let mapper = &**mapper;

                    scope.execute(move || {
                        // The receiver outlives the scope.
                        let _ = done.send((i, run_unit(mapper, &part, cancel)));
                    });
                }
                drop(send);

                collector.collect(&recv, None);
                // Leaving the scope joins every worker.
            });
        }
        Some(timeout) => {
            let pool = ThreadPool::new(workers);

            for (i, part) in partitions.into_iter().enumerate() {
                let done = send.clone();
                let cancel = Arc::clone(&cancel);
                let mapper = Arc::clone(mapper);

                pool.execute(move || {
                    // The receiver is gone if the run was abandoned.
                    let _ = done.send((i, run_unit(&*mapper, &part, &cancel)));
                });
            }
            drop(send);

            collector.collect(&recv, Some(start + timeout));
            if collector.timed_out {
                warn!("map phase timed out; cancelling outstanding units");
                cancel.store(true, Ordering::Relaxed);
            }
            // Dropping the pool does not wait for units still running.
        }
    }

    let partials = collector.finish(params.map_timeout)?;
    info!("map phase finished in {:?}", start.elapsed());
    Ok(partials)
}

/// A configured job: partition, map, reduce and take the maximum.
pub struct MRController<MR: Mapper + Reducer + 'static> {
    params: MRParameters,
    mr: Arc<MR>,
}

impl MRController<FlightCounter> {
    /// The standard flight counting job.
    pub fn flight_counter(params: MRParameters) -> Result<MRController<FlightCounter>> {
        MRController::new(FlightCounter, params)
    }
}

impl<MR: Mapper + Reducer + 'static> MRController<MR> {
    /// Create a new mapreduce instance. Fails if `params` are out of range.
    pub fn new(mr: MR, params: MRParameters) -> Result<MRController<MR>> {
        params.validate()?;
        Ok(MRController {
            params,
            mr: Arc::new(mr),
        })
    }

    pub fn params(&self) -> &MRParameters {
        &self.params
    }

    pub fn partition(&self, records: Vec<Flight>) -> Result<Vec<Partition>> {
        partition::partition(records, self.params.partition_size)
    }

    pub fn run_map(&self, partitions: Vec<Partition>) -> Result<Vec<PartialResult>> {
        run(&self.mr, &self.params, partitions)
    }

    pub fn run_reduce(&self, partials: Vec<PartialResult>) -> GlobalResult {
        let start = Instant::now();
        let result = self.mr.reduce(partials);
        info!("reduce phase: {} keys in {:?}", result.len(), start.elapsed());
        result
    }

    /// Partition, map and reduce `records`.
    pub fn compute(&self, records: Vec<Flight>) -> Result<GlobalResult> {
        let n = records.len();
        let partitions = self.partition(records)?;
        info!("{} records in {} partitions", n, partitions.len());

        let partials = self.run_map(partitions)?;
        Ok(self.run_reduce(partials))
    }

    /// Runs the whole job and returns the passengers with the most flights.
    pub fn max_flights(&self, records: Vec<Flight>) -> Result<MaxFlights> {
        let result = self.compute(records)?;
        find_max(&result)
    }
}
