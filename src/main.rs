use clap::{CommandFactory, Parser};
use parsum::adapters::{
    ConsoleOutputAdapter, GlobSourceAdapter, JsonOutputAdapter, MultiDigestHasher,
    ProgressBarAdapter,
};
use parsum::cli::{Cli, OutputFormat};
use parsum::ports::{FileSourcePort, OutputPort};
use parsum::services::DispatcherService;
use std::process;

fn main() {
    let args = Cli::parse();
    let config = args.to_hash_config();

    let source = GlobSourceAdapter::new();
    let files = match source.resolve_files(&args.patterns) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error resolving inputs: {e:#}");
            process::exit(2);
        }
    };

    if files.is_empty() {
        let _ = Cli::command().print_help();
        println!();
        return;
    }

    let hasher = MultiDigestHasher::new()
        .with_buffer_size(config.buffer_size)
        .with_mmap_threshold(config.mmap_threshold);
    let progress = ProgressBarAdapter::new().with_quiet(args.quiet);
    let service = DispatcherService::new(hasher, progress);

    match service.run(&files, &config) {
        Ok(report) => {
            let output: Box<dyn OutputPort> = match args.output_format {
                OutputFormat::Text => Box::new(ConsoleOutputAdapter::new()),
                OutputFormat::Json => match args.output_file {
                    Some(ref path) => {
                        Box::new(JsonOutputAdapter::with_file(path).unwrap_or_else(|e| {
                            eprintln!("Error creating output file: {}", e);
                            process::exit(2);
                        }))
                    }
                    None => Box::new(JsonOutputAdapter::with_stdout()),
                },
            };

            if let Err(e) = output.write_report(&report) {
                eprintln!("Error writing results: {}", e);
                process::exit(2);
            }

            if report.has_failures() {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2);
        }
    }
}
