//! YouTube video identifiers.
//!
//! A [`VideoId`] is the cache key for both the downloaded audio and the stored
//! transcript, so it is validated before it ever touches the filesystem.

use crate::error::{Result, VidchatError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// Characters YouTube uses in video IDs. Anything else (notably `/` and `.`)
/// would let an ID escape the storage directories.
static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("Invalid regex"));

const WATCH_URL: &str = "https://www.youtube.com/watch";

/// Opaque identifier of a YouTube video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Parse a bare video ID or any common YouTube URL.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        let candidate = if input.contains('/') || input.contains('.') {
            extract_from_url(input)
                .ok_or_else(|| VidchatError::InvalidVideoId(input.to_string()))?
        } else {
            input.to_string()
        };

        if BARE_ID.is_match(&candidate) {
            Ok(Self(candidate))
        } else {
            Err(VidchatError::InvalidVideoId(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL used for downloads.
    pub fn watch_url(&self) -> String {
        Url::parse_with_params(WATCH_URL, &[("v", self.0.as_str())])
            .map(String::from)
            .unwrap_or_else(|_| format!("{}?v={}", WATCH_URL, self.0))
    }

    /// File name for this video with the given extension.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }
}

/// Pull the video ID out of a YouTube URL, tolerating a missing scheme.
fn extract_from_url(input: &str) -> Option<String> {
    let url = Url::parse(input)
        .or_else(|_| Url::parse(&format!("https://{}", input)))
        .ok()?;

    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
            if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
                return Some(v.into_owned());
            }
            let mut segments = url.path_segments()?;
            match segments.next()? {
                "embed" | "v" | "shorts" | "live" => segments.next().map(str::to_string),
                _ => None,
            }
        }
        _ => None,
    }
    .filter(|id| !id.is_empty())
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for VideoId {
    type Err = VidchatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VideoId {
    type Error = VidchatError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
