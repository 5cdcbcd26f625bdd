mod exclusion;
mod walk;

pub use exclusion::{is_always_skipped, ExclusionSet, PROTECTED_EXCLUSIONS};
pub use walk::{scan_media_tree, FileEntry, ScanResult};
