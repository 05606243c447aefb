use crate::domain::{FileReport, HashAlgorithm, RunReport};
use anyhow::Result;
use std::path::{Path, PathBuf};

pub trait FileSourcePort {
    fn resolve_files(&self, patterns: &[String]) -> Result<Vec<PathBuf>>;
}

pub trait HashingPort {
    /// Produce exactly one report per call, capturing open and read
    /// failures in the report rather than returning an error.
    fn digest_file(&self, path: &Path, algorithms: &[HashAlgorithm]) -> FileReport;
}

pub trait OutputPort {
    fn write_report(&self, report: &RunReport) -> Result<()>;
}

pub trait ProgressPort {
    fn start(&self, total: u64);
    fn update(&self, processed: u64);
    fn finish(&self);
}
