//! Checking independent properties on several threads.
//!
//! Every property owns its execution context, so properties never share a
//! random source or generator cache. Within one property tries stay
//! sequential.

use std::fmt::Debug;
use std::panic;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::execution::{CheckSummary, Property};

/// A property with its sample type erased
pub trait PropertyJob: Send + Sync {
    fn name(&self) -> &str;

    /// Check the property and summarize the outcome
    fn run(&self) -> CheckSummary;
}

impl<T: Clone + Debug + Send + Sync + 'static> PropertyJob for Property<T> {
    fn name(&self) -> &str {
        Property::name(self)
    }

    fn run(&self) -> CheckSummary {
        self.check().summary()
    }
}

impl<T: Clone + Debug + Send + Sync + 'static> Property<T> {
    /// Box this property for [`check_concurrently`]
    pub fn into_job(self) -> Box<dyn PropertyJob> {
        Box::new(self)
    }
}

/// Check all `jobs`, using up to one worker thread per CPU.
///
/// Summaries are returned in the order of `jobs`. A panic escaping a check,
/// such as a [`Fatal`](crate::falsifier::Fatal) one, is resumed on the
/// calling thread after all workers have stopped.
pub fn check_concurrently(jobs: Vec<Box<dyn PropertyJob>>) -> Vec<CheckSummary> {
    check_with_workers(jobs, num_cpus::get())
}

/// Like [`check_concurrently`] with an explicit number of workers
pub fn check_with_workers(jobs: Vec<Box<dyn PropertyJob>>, workers: usize) -> Vec<CheckSummary> {
    if jobs.is_empty() {
        return Vec::new();
    }
    let workers = workers.clamp(1, jobs.len());
    log::debug!("checking {} properties on {} workers", jobs.len(), workers);

    let next = AtomicUsize::new(0);
    let results: Mutex<Vec<Option<CheckSummary>>> = Mutex::new(vec![None; jobs.len()]);

    let scoped = crossbeam::scope(|s| {
        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let (jobs, next, results) = (&jobs, &next, &results);
            handles.push(s.spawn(move |_| {
                loop {
                    let index = next.fetch_add(1, Ordering::SeqCst);
                    let Some(job) = jobs.get(index) else {
                        break;
                    };
                    log::trace!("worker {} checks {}", worker, job.name());
                    let summary = job.run();
                    let mut results = results
                        .lock()
                        .unwrap_or_else(std::sync::PoisonError::into_inner);
                    results[index] = Some(summary);
                }
            }));
        }

        let mut escaped = None;
        for handle in handles {
            if let Err(payload) = handle.join() {
                // Stop handing out jobs; running ones finish first.
                next.store(usize::MAX / 2, Ordering::SeqCst);
                escaped.get_or_insert(payload);
            }
        }
        escaped
    });

    match scoped {
        Ok(Some(payload)) | Err(payload) => panic::resume_unwind(payload),
        Ok(None) => {}
    }

    results
        .into_inner()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .into_iter()
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::{integers, strings};
    use crate::config::PropertyConfig;
    use crate::execution::CheckStatus;
    use crate::falsifier::fatal;

    fn config() -> PropertyConfig {
        PropertyConfig::default().with_seed("7").with_tries(200)
    }

    fn jobs() -> Vec<Box<dyn PropertyJob>> {
        vec![
            Property::new("succeeds", integers::<i32>(), |_: &i32| true)
                .with_config(config())
                .into_job(),
            Property::new("small", integers::<i64>(), |v: &i64| *v < 10)
                .with_config(config())
                .into_job(),
            Property::new("short", strings(), |s: &String| s.chars().count() < 3)
                .with_config(config())
                .into_job(),
        ]
    }

    #[test]
    fn test_summaries_in_job_order() {
        let summaries = check_concurrently(jobs());
        let names: Vec<&str> = summaries.iter().map(|s| s.property.as_str()).collect();
        assert_eq!(names, vec!["succeeds", "small", "short"]);
        assert_eq!(summaries[0].status, CheckStatus::Successful);
        assert_eq!(summaries[1].status, CheckStatus::Failed);
        assert_eq!(summaries[1].sample.as_deref(), Some("10"));
        assert_eq!(summaries[2].status, CheckStatus::Failed);
    }

    #[test]
    fn test_same_results_as_sequential_checks() {
        let sequential: Vec<CheckSummary> = jobs().iter().map(|job| job.run()).collect();
        assert_eq!(check_with_workers(jobs(), 2), sequential);
        assert_eq!(check_with_workers(jobs(), 1), sequential);
    }

    #[test]
    fn test_no_jobs() {
        assert!(check_concurrently(Vec::new()).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_fatal_panics_are_resumed() {
        let mut jobs = jobs();
        jobs.push(
            Property::new("fatal", integers::<u8>(), |_: &u8| -> bool { fatal("broken setup") })
                .with_config(config())
                .into_job(),
        );
        check_concurrently(jobs);
    }
}
