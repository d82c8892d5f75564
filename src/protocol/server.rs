//! Subprocess stdout protocol.
//!
//! The supervised native core emits one complete JSON object per stdout line.
//! `payload` holds the variant data, so the line for a listening announcement
//! reads:
//!
//! ```json
//! {"kind":"Listening","payload":{"bind_address":"127.0.0.1:8090"}}
//! ```

use serde::{Deserialize, Serialize};

use super::ServedFile;

/// One status record from the supervised core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload")]
pub enum ServerOutputMsg {
    /// Core is accepting HTTP connections on this address.
    Listening { bind_address: String },
    /// A served file changed on disk.
    FsNotify { item: ServedFile },
}

impl ServerOutputMsg {
    /// Parse one stdout line. `None` for malformed or unknown kinds; the
    /// supervisor logs and discards those without aborting.
    pub fn parse_line(line: &str) -> Option<Self> {
        serde_json::from_str(line.trim()).ok()
    }
}
