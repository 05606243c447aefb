pub mod filesystem;
pub mod multi_hasher;
pub mod output;
pub mod progress;

pub use filesystem::GlobSourceAdapter;
pub use multi_hasher::MultiDigestHasher;
pub use output::{ConsoleOutputAdapter, JsonOutputAdapter};
pub use progress::ProgressBarAdapter;
