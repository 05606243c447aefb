use crate::domain::{HashAlgorithm, HashConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "parsum")]
#[command(about = "Compute checksums over many files in parallel")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Files or glob patterns to hash", value_name = "FILE")]
    pub patterns: Vec<String>,

    #[arg(long, help = "Compute the CRC32 checksum")]
    pub crc32: bool,

    #[arg(long, help = "Compute the CRC64 checksum")]
    pub crc64: bool,

    #[arg(long, help = "Compute the SHA224 hash")]
    pub sha224: bool,

    #[arg(long, help = "Compute the SHA256 hash (the default)")]
    pub sha256: bool,

    #[arg(long, help = "Compute the SHA384 hash")]
    pub sha384: bool,

    #[arg(long, help = "Compute the SHA512 hash")]
    pub sha512: bool,

    #[arg(short = 'a', long, help = "Compute every supported hash")]
    pub all: bool,

    #[arg(
        short = 'n',
        long = "jobs",
        help = "Number of files to hash in parallel (0 = one per core)",
        default_value = "1"
    )]
    pub jobs: usize,

    #[arg(short = 'q', long = "quiet", help = "Suppress progress output")]
    pub quiet: bool,

    #[arg(
        long = "buffer-size",
        help = "Read buffer size in bytes",
        default_value = "4096"
    )]
    pub buffer_size: usize,

    #[arg(
        long = "mmap-threshold",
        help = "File size threshold for memory mapping",
        default_value = "67108864"
    )]
    pub mmap_threshold: u64,

    #[arg(
        short = 'f',
        long = "format",
        help = "Output format",
        value_enum,
        default_value = "text"
    )]
    pub output_format: OutputFormat,

    #[arg(
        short = 'o',
        long = "output",
        help = "Output file path for JSON (stdout if not specified)"
    )]
    pub output_file: Option<PathBuf>,
}

impl Cli {
    fn algorithm_enabled(&self, algorithm: HashAlgorithm) -> bool {
        if self.all {
            return true;
        }
        match algorithm {
            HashAlgorithm::Crc32 => self.crc32,
            HashAlgorithm::Crc64 => self.crc64,
            HashAlgorithm::Sha224 => self.sha224,
            HashAlgorithm::Sha256 => self.sha256,
            HashAlgorithm::Sha384 => self.sha384,
            HashAlgorithm::Sha512 => self.sha512,
        }
    }

    pub fn to_hash_config(&self) -> HashConfig {
        let mut algorithms: Vec<HashAlgorithm> = HashAlgorithm::ALL
            .into_iter()
            .filter(|&a| self.algorithm_enabled(a))
            .collect();

        if algorithms.is_empty() {
            algorithms.push(HashAlgorithm::Sha256);
        }

        HashConfig::new()
            .with_algorithms(algorithms)
            .with_parallelism(self.jobs)
            .with_buffer_size(self.buffer_size)
            .with_mmap_threshold(self.mmap_threshold)
    }
}
