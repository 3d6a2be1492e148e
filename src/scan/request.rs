//! Scan request identity
//!
//! Every scan request gets a `scan-<16 hex>` id naming its scratch
//! directories and correlating its log lines. The id hashes the participating
//! paths together with a process-unique counter, so two requests over the
//! same buffers never collide.

use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a collision-resistant request id for one batch of paths.
pub fn request_id<'a>(paths: impl IntoIterator<Item = &'a Path>) -> String {
    let mut hasher = Sha256::new();
    for path in paths {
        hasher.update(path.as_os_str().as_encoded_bytes());
        hasher.update([0u8]);
    }
    hasher.update(std::process::id().to_le_bytes());
    hasher.update(
        REQUEST_COUNTER
            .fetch_add(1, Ordering::Relaxed)
            .to_le_bytes(),
    );

    let digest = hasher.finalize();
    let hex: String = digest.iter().take(8).map(|b| format!("{:02x}", b)).collect();
    format!("scan-{}", hex)
}
