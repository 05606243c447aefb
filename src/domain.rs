use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HashAlgorithm {
    Crc32,
    Crc64,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Canonical ordering: digests within one file's report always appear
    /// in this order, regardless of how the flags were composed.
    pub const ALL: [HashAlgorithm; 6] = [
        HashAlgorithm::Crc32,
        HashAlgorithm::Crc64,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Crc32 => "CRC32",
            HashAlgorithm::Crc64 => "CRC64",
            HashAlgorithm::Sha224 => "SHA224",
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha384 => "SHA384",
            HashAlgorithm::Sha512 => "SHA512",
        }
    }

    pub fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Crc32 => 4,
            HashAlgorithm::Crc64 => 8,
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digest {
    pub algorithm: HashAlgorithm,
    #[serde(rename = "digest", serialize_with = "hex_bytes")]
    pub bytes: Vec<u8>,
}

impl Digest {
    pub fn new(algorithm: HashAlgorithm, bytes: Vec<u8>) -> Self {
        Self { algorithm, bytes }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

fn hex_bytes<S: Serializer>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Hashed { digests: Vec<Digest>, bytes: u64 },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn hashed(path: PathBuf, digests: Vec<Digest>, bytes: u64) -> Self {
        Self {
            path,
            outcome: FileOutcome::Hashed { digests, bytes },
        }
    }

    pub fn failed(path: PathBuf, error: String) -> Self {
        Self {
            path,
            outcome: FileOutcome::Failed { error },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, FileOutcome::Failed { .. })
    }

    pub fn digests(&self) -> Option<&[Digest]> {
        match &self.outcome {
            FileOutcome::Hashed { digests, .. } => Some(digests),
            FileOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HashConfig {
    pub algorithms: Vec<HashAlgorithm>,
    pub parallelism: usize,
    pub buffer_size: usize,
    pub mmap_threshold: u64,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            algorithms: vec![HashAlgorithm::Sha256],
            parallelism: 1,
            buffer_size: 4096,
            mmap_threshold: 64 * 1024 * 1024,
        }
    }
}

impl HashConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_algorithms(mut self, algorithms: Vec<HashAlgorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    pub total_files: usize,
    pub total_bytes: u64,
    pub failures: usize,
}

impl RunReport {
    pub fn new(files: Vec<FileReport>) -> Self {
        let total_files = files.len();
        let total_bytes = files
            .iter()
            .filter_map(|f| match &f.outcome {
                FileOutcome::Hashed { bytes, .. } => Some(*bytes),
                FileOutcome::Failed { .. } => None,
            })
            .sum();
        let failures = files.iter().filter(|f| f.is_failed()).count();
        Self {
            files,
            total_files,
            total_bytes,
            failures,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }
}
