use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parbatch::io::{JobSource, ResultFile, SyntheticJobs};
use parbatch::log::SilentLog;
use parbatch::partition::Partitioner;
use parbatch::{BatchError, Coordinator, Job, JobResult};

fn coordinator(workers: usize) -> Coordinator {
    Coordinator::new(workers)
        .unwrap()
        .with_log(Arc::new(SilentLog))
}

fn run_to_vec(workers: usize, jobs: &[Job]) -> Vec<JobResult> {
    let mut source = jobs.to_vec();
    let mut out: Vec<JobResult> = Vec::new();
    coordinator(workers).run(&mut source, &mut out).unwrap();
    out
}

#[test]
fn test_worker_count_does_not_change_results() {
    let jobs = SyntheticJobs::seeded(1_003, 11).generate().unwrap();
    let single = run_to_vec(1, &jobs);
    let grouped = run_to_vec(4, &jobs);
    assert_eq!(single.len(), jobs.len());
    assert_eq!(grouped.len(), jobs.len());

    // Re-sort the four-worker output by original job index
    let order = Partitioner::gather(Partitioner::new(4).unwrap().assign(jobs.len()));
    let mut restored = vec![None; jobs.len()];
    for (job_index, result) in order.into_iter().zip(grouped) {
        restored[job_index] = Some(result);
    }
    let restored: Vec<JobResult> = restored.into_iter().map(Option::unwrap).collect();

    assert_eq!(restored, single);
}

#[test]
fn test_seeded_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");

    for path in [&first, &second] {
        let mut source = SyntheticJobs::seeded(750, 2024);
        let mut sink = ResultFile::new(path);
        coordinator(3).run(&mut source, &mut sink).unwrap();
        assert_eq!(sink.results_written(), 750);
    }

    let a = fs::read(&first).unwrap();
    let b = fs::read(&second).unwrap();
    assert!(!a.is_empty());
    assert_eq!(a, b);
    assert_eq!(String::from_utf8(a).unwrap().lines().count(), 750);
}

#[test]
fn test_zero_workers_rejected_before_generation() {
    let err = Coordinator::new(0).err().unwrap();
    assert!(matches!(err, BatchError::Config { .. }));
}

#[test]
fn test_more_workers_than_jobs() {
    let jobs = SyntheticJobs::seeded(3, 1).generate().unwrap();
    let out = run_to_vec(8, &jobs);
    assert_eq!(out, run_to_vec(1, &jobs));
}

#[test]
fn test_no_jobs_writes_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    let mut source: Vec<Job> = Vec::new();
    let mut sink = ResultFile::new(&path);

    let summary = coordinator(2).run(&mut source, &mut sink).unwrap();
    assert_eq!(summary.jobs, 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_zero_amplitude_jobs_integrate_to_zero() {
    let jobs: Vec<Job> = (1..=50)
        .map(|n| Job::new(0.0, n as f64 * 0.1, 0.5, 2.5, n).unwrap())
        .collect();
    for result in run_to_vec(5, &jobs) {
        assert_eq!(result.integral, 0.0);
    }
}

#[test]
fn test_failed_run_leaves_output_untouched() {
    struct Reject;
    impl parbatch::integrate::Computation for Reject {
        fn evaluate(&self, _job: &Job) -> parbatch::Result<JobResult> {
            Err(BatchError::evaluation("rejected"))
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    fs::write(&path, "previous\n").unwrap();

    let mut source = SyntheticJobs::seeded(20, 3);
    let mut sink = ResultFile::new(&path);
    let err = coordinator(2)
        .with_computation(Arc::new(Reject))
        .run(&mut source, &mut sink)
        .unwrap_err();

    assert!(matches!(err, BatchError::Computation { worker: 0, position: 0, .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "previous\n");
}

#[test]
fn test_siblings_finish_after_a_worker_fails() {
    // Worker 0 owns the jobs with N = 1, 5, 9, ...
    struct FailFirstWorker {
        evaluated: AtomicUsize,
    }
    impl parbatch::integrate::Computation for FailFirstWorker {
        fn evaluate(&self, job: &Job) -> parbatch::Result<JobResult> {
            if (job.subdivisions() - 1) % 4 == 0 {
                return Err(BatchError::evaluation("rejected"));
            }
            self.evaluated.fetch_add(1, Ordering::SeqCst);
            Ok(JobResult::new(0.0))
        }
    }

    let computation = Arc::new(FailFirstWorker {
        evaluated: AtomicUsize::new(0),
    });
    let mut source: Vec<Job> = (1..=40)
        .map(|n| Job::new(1.0, 1.0, 0.0, 1.0, n).unwrap())
        .collect();
    let mut out: Vec<JobResult> = Vec::new();

    let err = coordinator(4)
        .with_computation(computation.clone())
        .run(&mut source, &mut out)
        .unwrap_err();

    assert!(matches!(err, BatchError::Computation { worker: 0, position: 0, .. }), "{err}");
    assert_eq!(computation.evaluated.load(Ordering::SeqCst), 30);
    assert!(out.is_empty());
}
