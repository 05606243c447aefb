use crate::domain::{Digest, FileReport, HashAlgorithm};
use crate::ports::HashingPort;
use crc::{CRC_64_GO_ISO, Crc};
use memmap2::MmapOptions;
use sha2::{Digest as _, Sha224, Sha256, Sha384, Sha512};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

// ISO 3309 polynomial, the same table the CRC64 output label refers to.
static CRC64_ISO: Crc<u64> = Crc::<u64>::new(&CRC_64_GO_ISO);

/// Incremental state for one algorithm. Owned by exactly one hashing task,
/// fed sequential chunks, finalized at most once.
enum Accumulator {
    Crc32(crc32fast::Hasher),
    Crc64(crc::Digest<'static, u64>),
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

impl Accumulator {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Crc32 => Self::Crc32(crc32fast::Hasher::new()),
            HashAlgorithm::Crc64 => Self::Crc64(CRC64_ISO.digest()),
            HashAlgorithm::Sha224 => Self::Sha224(Sha224::new()),
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Sha384 => Self::Sha384(Sha384::new()),
            HashAlgorithm::Sha512 => Self::Sha512(Sha512::new()),
        }
    }

    fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::Crc32(_) => HashAlgorithm::Crc32,
            Self::Crc64(_) => HashAlgorithm::Crc64,
            Self::Sha224(_) => HashAlgorithm::Sha224,
            Self::Sha256(_) => HashAlgorithm::Sha256,
            Self::Sha384(_) => HashAlgorithm::Sha384,
            Self::Sha512(_) => HashAlgorithm::Sha512,
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Crc32(h) => h.update(data),
            Self::Crc64(h) => h.update(data),
            Self::Sha224(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha384(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
        }
    }

    fn finalize(self) -> Digest {
        let algorithm = self.algorithm();
        let bytes = match self {
            // CRC words print big-endian, matching the familiar cksum forms.
            Self::Crc32(h) => h.finalize().to_be_bytes().to_vec(),
            Self::Crc64(h) => h.finalize().to_be_bytes().to_vec(),
            Self::Sha224(h) => h.finalize().to_vec(),
            Self::Sha256(h) => h.finalize().to_vec(),
            Self::Sha384(h) => h.finalize().to_vec(),
            Self::Sha512(h) => h.finalize().to_vec(),
        };
        Digest::new(algorithm, bytes)
    }
}

pub struct MultiDigestHasher {
    buffer_size: usize,
    mmap_threshold: u64,
}

impl MultiDigestHasher {
    pub fn new() -> Self {
        Self {
            buffer_size: 4096,
            mmap_threshold: 64 * 1024 * 1024,
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }

    fn build_accumulators(algorithms: &[HashAlgorithm]) -> Vec<Accumulator> {
        algorithms.iter().copied().map(Accumulator::new).collect()
    }

    fn digest_with_mmap(
        &self,
        file: &File,
        algorithms: &[HashAlgorithm],
    ) -> io::Result<(Vec<Digest>, u64)> {
        let mmap = unsafe { MmapOptions::new().map(file)? };
        let mut accumulators = Self::build_accumulators(algorithms);

        // Same chunking as the buffered path, so digests are identical.
        for chunk in mmap.chunks(self.buffer_size) {
            for accumulator in accumulators.iter_mut() {
                accumulator.update(chunk);
            }
        }

        let digests = accumulators.into_iter().map(Accumulator::finalize).collect();
        Ok((digests, mmap.len() as u64))
    }

    fn digest_with_buffered_io(
        &self,
        file: File,
        algorithms: &[HashAlgorithm],
    ) -> io::Result<(Vec<Digest>, u64)> {
        let mut accumulators = Self::build_accumulators(algorithms);
        let mut reader = BufReader::new(file);
        let mut buffer = vec![0u8; self.buffer_size];
        let mut bytes_processed = 0u64;

        loop {
            let read_count = match reader.read(&mut buffer) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if read_count == 0 {
                break;
            }

            // Every accumulator sees the exact slice read, in order, before
            // the next read. Identical byte streams, identical chunking.
            for accumulator in accumulators.iter_mut() {
                accumulator.update(&buffer[..read_count]);
            }
            bytes_processed += read_count as u64;
        }

        let digests = accumulators.into_iter().map(Accumulator::finalize).collect();
        Ok((digests, bytes_processed))
    }
}

impl HashingPort for MultiDigestHasher {
    fn digest_file(&self, path: &Path, algorithms: &[HashAlgorithm]) -> FileReport {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                return FileReport::failed(path.to_path_buf(), format!("unable to open: {e}"));
            }
        };

        let file_size = file.metadata().map(|m| m.len()).unwrap_or(0);

        // Mapping a zero-length file is an error on most platforms, so empty
        // files always go through the buffered path.
        let result = if file_size >= self.mmap_threshold && file_size > 0 {
            self.digest_with_mmap(&file, algorithms)
        } else {
            self.digest_with_buffered_io(file, algorithms)
        };

        match result {
            Ok((digests, bytes)) => FileReport::hashed(path.to_path_buf(), digests, bytes),
            Err(e) => FileReport::failed(path.to_path_buf(), format!("read failed: {e}")),
        }
    }
}
