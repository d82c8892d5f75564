//! Client transport message types.
//!
//! One JSON object per WebSocket text frame, tagged by `kind`:
//!
//! | kind       | payload              | direction                      |
//! |------------|----------------------|--------------------------------|
//! | Connect    | none                 | informational                  |
//! | Disconnect | none                 | informational                  |
//! | Scroll     | `x`, `y`             | client -> server -> other clients |
//! | FsNotify   | `item: ServedFile`   | server -> client (reload trigger) |

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One file reachable through the dev server.
///
/// `web_path` is the URL-facing path the file is served under; classification
/// always uses it rather than the on-disk `path` so match rules never leak
/// internal directory layout.
#[derive(Default, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct ServedFile {
    pub path: PathBuf,
    pub web_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
}

impl ServedFile {
    pub fn new(path: impl Into<PathBuf>, web_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            web_path: web_path.into(),
            referer: None,
        }
    }

    /// Served path as a UTF-8 string (lossy; only used for suffix matching).
    pub fn served_path(&self) -> String {
        self.web_path.to_string_lossy().into_owned()
    }
}

/// Messages exchanged over the client transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClientMsg {
    Connect,
    Disconnect,
    Scroll(ScrollMsg),
    FsNotify(FsNotify),
}

impl ClientMsg {
    /// Serialize to a single JSON text frame.
    pub fn to_json(&self) -> String {
        // A ClientMsg always serializes; the fallback keeps clients alive even
        // if a future variant breaks that assumption.
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"kind":"Disconnect"}"#.to_string())
    }

    /// Parse from a JSON text frame. `None` for malformed or unknown kinds.
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

/// Payload of a file change notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsNotify {
    pub item: ServedFile,
}

impl FsNotify {
    pub fn new(item: impl Into<ServedFile>) -> Self {
        Self { item: item.into() }
    }
}

/// Scroll position report. Advisory only; intermediate positions may be
/// coalesced in transit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScrollMsg {
    pub x: f64,
    pub y: f64,
}
