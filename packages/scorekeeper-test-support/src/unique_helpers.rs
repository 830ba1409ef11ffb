//! Unique test data built from ULIDs so parallel tests never collide.

use std::path::{Path, PathBuf};

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use scorekeeper_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("player");
/// let b = unique_str("player");
/// assert_ne!(a, b);
/// assert!(a.starts_with("player-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A state file path under `dir` that no other test uses.
///
/// ```
/// use std::path::Path;
/// use scorekeeper_test_support::unique_helpers::unique_state_path;
///
/// let path = unique_state_path(Path::new("/tmp"));
/// assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
/// ```
pub fn unique_state_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}.json", unique_str("state")))
}
