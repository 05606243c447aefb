use crate::domain::{HashConfig, RunReport};
use crate::ports::{HashingPort, ProgressPort};
use anyhow::{Context, Result};
use crossbeam_channel::bounded;
use std::path::PathBuf;

/// Fans one hashing task per file out onto a bounded worker pool and drains
/// the results back through a channel. Arrival order across files is
/// unspecified; a per-file failure never aborts the run.
pub struct DispatcherService<H, P> {
    hasher: H,
    progress: P,
}

impl<H, P> DispatcherService<H, P>
where
    H: HashingPort + Send + Sync,
    P: ProgressPort + Send + Sync,
{
    pub fn new(hasher: H, progress: P) -> Self {
        Self { hasher, progress }
    }

    pub fn run(&self, files: &[PathBuf], config: &HashConfig) -> Result<RunReport> {
        if files.is_empty() {
            return Ok(RunReport::new(Vec::new()));
        }

        // num_threads(0) lets the pool pick one worker per core.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallelism)
            .build()
            .context("failed to build the worker pool")?;

        // Sized to the file count: every task sends exactly once, so no
        // send ever blocks and no result is ever dropped.
        let (sender, receiver) = bounded(files.len());

        self.progress.start(files.len() as u64);

        let mut reports = Vec::with_capacity(files.len());
        pool.in_place_scope(|scope| {
            for path in files {
                let sender = sender.clone();
                scope.spawn(move |_| {
                    let report = self.hasher.digest_file(path, &config.algorithms);
                    let _ = sender.send(report);
                });
            }
            drop(sender);

            for drained in 1..=files.len() {
                match receiver.recv() {
                    Ok(report) => {
                        self.progress.update(drained as u64);
                        reports.push(report);
                    }
                    Err(_) => break,
                }
            }
        });

        self.progress.finish();

        Ok(RunReport::new(reports))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MultiDigestHasher;
    use crate::domain::{FileReport, HashAlgorithm};
    use crate::ports::ProgressPort;
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingProgress {
        started: AtomicU64,
        updates: AtomicU64,
        finished: AtomicU64,
    }

    impl ProgressPort for RecordingProgress {
        fn start(&self, total: u64) {
            self.started.store(total, Ordering::SeqCst);
        }

        fn update(&self, _processed: u64) {
            self.updates.fetch_add(1, Ordering::SeqCst);
        }

        fn finish(&self) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct SlowFirstHasher;

    impl HashingPort for SlowFirstHasher {
        fn digest_file(&self, path: &Path, _algorithms: &[HashAlgorithm]) -> FileReport {
            if path.ends_with("slow") {
                std::thread::sleep(std::time::Duration::from_millis(50));
            }
            FileReport::hashed(path.to_path_buf(), Vec::new(), 0)
        }
    }

    fn write_files(dir: &TempDir, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.path().join(format!("file-{i}.bin"));
                fs::write(&path, format!("content {i}")).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn every_file_is_reported_exactly_once() {
        let dir = TempDir::new().unwrap();
        let files = write_files(&dir, 24);
        let progress = RecordingProgress::default();
        let service = DispatcherService::new(MultiDigestHasher::new(), progress);
        let config = HashConfig::new().with_parallelism(4);

        let report = service.run(&files, &config).unwrap();
        assert_eq!(report.total_files, 24);
        assert_eq!(report.failures, 0);

        let reported: HashSet<_> = report.files.iter().map(|f| f.path.clone()).collect();
        let expected: HashSet<_> = files.into_iter().collect();
        assert_eq!(reported, expected);
    }

    #[test]
    fn progress_observes_every_completion() {
        let dir = TempDir::new().unwrap();
        let files = write_files(&dir, 8);
        let service = DispatcherService::new(MultiDigestHasher::new(), RecordingProgress::default());
        service.run(&files, &HashConfig::new().with_parallelism(2)).unwrap();

        assert_eq!(service.progress.started.load(Ordering::SeqCst), 8);
        assert_eq!(service.progress.updates.load(Ordering::SeqCst), 8);
        assert_eq!(service.progress.finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn a_failing_file_does_not_disturb_the_rest() {
        let dir = TempDir::new().unwrap();
        let mut files = write_files(&dir, 5);
        files.insert(2, dir.path().join("does-not-exist.bin"));

        let service = DispatcherService::new(MultiDigestHasher::new(), RecordingProgress::default());
        let config = HashConfig::new()
            .with_algorithms(vec![HashAlgorithm::Sha256])
            .with_parallelism(3);

        let report = service.run(&files, &config).unwrap();
        assert_eq!(report.total_files, 6);
        assert_eq!(report.failures, 1);

        let failed: Vec<_> = report.files.iter().filter(|f| f.is_failed()).collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].path.ends_with("does-not-exist.bin"));

        for file in report.files.iter().filter(|f| !f.is_failed()) {
            let digests = file.digests().unwrap();
            assert_eq!(digests.len(), 1);
            assert_eq!(digests[0].algorithm, HashAlgorithm::Sha256);
        }
    }

    #[test]
    fn results_are_collected_even_when_arrival_order_varies() {
        let files = vec![PathBuf::from("slow"), PathBuf::from("fast")];
        let service = DispatcherService::new(SlowFirstHasher, RecordingProgress::default());
        let config = HashConfig::new().with_parallelism(2);

        let report = service.run(&files, &config).unwrap();
        let reported: HashSet<_> = report.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(reported.len(), 2);
        assert!(reported.contains(&PathBuf::from("slow")));
        assert!(reported.contains(&PathBuf::from("fast")));
    }

    #[test]
    fn single_worker_pool_still_processes_everything() {
        let dir = TempDir::new().unwrap();
        let files = write_files(&dir, 6);
        let service = DispatcherService::new(MultiDigestHasher::new(), RecordingProgress::default());
        let report = service.run(&files, &HashConfig::new()).unwrap();
        assert_eq!(report.total_files, 6);
        assert_eq!(report.failures, 0);
    }

    #[test]
    fn empty_file_list_produces_an_empty_report() {
        let service = DispatcherService::new(MultiDigestHasher::new(), RecordingProgress::default());
        let report = service.run(&[], &HashConfig::new()).unwrap();
        assert_eq!(report.total_files, 0);
        assert!(!report.has_failures());
    }

    #[test]
    fn repeated_runs_yield_identical_digests() {
        let dir = TempDir::new().unwrap();
        let files = write_files(&dir, 4);
        let service = DispatcherService::new(MultiDigestHasher::new(), RecordingProgress::default());
        let config = HashConfig::new()
            .with_algorithms(vec![HashAlgorithm::Crc64, HashAlgorithm::Sha384])
            .with_parallelism(4);

        let mut first = service.run(&files, &config).unwrap().files;
        let mut second = service.run(&files, &config).unwrap().files;
        first.sort_by(|a, b| a.path.cmp(&b.path));
        second.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(first, second);
    }
}
