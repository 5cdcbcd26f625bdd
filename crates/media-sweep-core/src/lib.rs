pub mod collectors;
pub mod config;
pub mod deletion;
pub mod engine;
pub mod error;
pub mod extract;
pub mod media_root;
pub mod normalize;
pub mod progress;
pub mod reference;
pub mod scanner;
pub mod storage;

pub use collectors::{FeatureFlags, StaticFeatures, MEGA_MENU};
pub use config::AppConfig;
pub use deletion::{DeletionError, DeletionReport, FileRemover, LocalFs};
pub use engine::{SweepEngine, SweepReport};
pub use error::Error;
pub use extract::{ExtractionMode, Pipeline};
pub use normalize::{normalize, CanonicalPath};
pub use progress::{ProgressReporter, SilentReporter};
pub use reference::{ReferenceSet, ReferenceSetBuilder};
pub use scanner::{ExclusionSet, FileEntry, ScanResult};
