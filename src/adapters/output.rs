use crate::domain::{FileOutcome, RunReport};
use crate::ports::OutputPort;
use anyhow::Result;
use console::style;
use std::path::Path;

struct OutputWriter {
    output_file: Option<String>,
}

impl OutputWriter {
    fn new() -> Self {
        Self { output_file: None }
    }

    fn with_file(path: &Path) -> Result<Self> {
        Ok(Self {
            output_file: Some(path.to_string_lossy().to_string()),
        })
    }

    fn write_content(&self, content: &str) -> Result<()> {
        match &self.output_file {
            Some(path) => {
                std::fs::write(path, content)?;
            }
            None => {
                print!("{}", content);
            }
        }
        Ok(())
    }
}

/// One `<hex> <ALGORITHM> <filename>` line per digest, in algorithm order.
fn digest_lines(report: &RunReport) -> String {
    let mut output = String::new();
    for file in &report.files {
        if let FileOutcome::Hashed { digests, .. } = &file.outcome {
            for digest in digests {
                output.push_str(&format!(
                    "{} {} {}\n",
                    digest.to_hex(),
                    digest.algorithm,
                    file.path.display()
                ));
            }
        }
    }
    output
}

pub struct ConsoleOutputAdapter;

impl ConsoleOutputAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputPort for ConsoleOutputAdapter {
    fn write_report(&self, report: &RunReport) -> Result<()> {
        print!("{}", digest_lines(report));

        // Failures go to the diagnostic stream, never between digest lines.
        for file in &report.files {
            if let FileOutcome::Failed { error } = &file.outcome {
                eprintln!(
                    "{} {}: {}",
                    style("error:").red().bold(),
                    file.path.display(),
                    error
                );
            }
        }

        Ok(())
    }
}

pub struct JsonOutputAdapter {
    writer: OutputWriter,
}

impl JsonOutputAdapter {
    pub fn with_file(path: &Path) -> Result<Self> {
        Ok(Self {
            writer: OutputWriter::with_file(path)?,
        })
    }

    pub fn with_stdout() -> Self {
        Self {
            writer: OutputWriter::new(),
        }
    }
}

impl OutputPort for JsonOutputAdapter {
    fn write_report(&self, report: &RunReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_content(&format!("{}\n", json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Digest, FileReport, HashAlgorithm};

    fn sample_report() -> RunReport {
        RunReport::new(vec![
            FileReport::hashed(
                "data.bin".into(),
                vec![
                    Digest::new(HashAlgorithm::Crc32, vec![0x36, 0x3A, 0x30, 0x20]),
                    Digest::new(HashAlgorithm::Sha256, vec![0xAB; 32]),
                ],
                6,
            ),
            FileReport::failed("gone.bin".into(), "unable to open".into()),
        ])
    }

    #[test]
    fn digest_lines_follow_the_output_format() {
        let lines = digest_lines(&sample_report());
        let expected_sha = "ab".repeat(32);
        assert_eq!(
            lines,
            format!("363a3020 CRC32 data.bin\n{expected_sha} SHA256 data.bin\n")
        );
    }

    #[test]
    fn failed_files_produce_no_digest_lines() {
        let report = RunReport::new(vec![FileReport::failed(
            "gone.bin".into(),
            "unable to open".into(),
        )]);
        assert!(digest_lines(&report).is_empty());
    }

    #[test]
    fn json_report_contains_digests_and_failures() {
        let json = serde_json::to_string_pretty(&sample_report()).unwrap();
        assert!(json.contains("\"algorithm\": \"Crc32\""));
        assert!(json.contains("\"digest\": \"363a3020\""));
        assert!(json.contains("\"status\": \"failed\""));
        assert!(json.contains("\"failures\": 1"));
    }
}
