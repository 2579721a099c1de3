//! Hands the saved chart to the system image viewer.

use std::path::Path;
use tracing::{info, warn};

/// Open `path` with the default application. Failures are logged, not returned.
pub fn show(path: &Path) -> bool {
    match open::that(path) {
        Ok(()) => {
            info!(path = %path.display(), "Opened chart in the system viewer");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not open chart viewer");
            false
        }
    }
}
