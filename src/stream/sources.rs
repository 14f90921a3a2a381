//! Decrypted source tree → flat [`SourceEntry`] list.
//!
//! The decrypted payload looks like:
//!
//! ```json
//! { "sources": {
//!     "s1": { "server": "Alpha", "url": "...", "type": "hls", "quality": "1080p" },
//!     "s2": { "server": "Beta", "speed": "fast", "bitrate": "HD",
//!             "qualities": { "720p": { "url": "...", "type": "mp4" } } } } }
//! ```
//!
//! Every field is optional. Keys are walked in document order, which is the
//! order streams are presented in.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Result, StreamError};
use crate::identity::leading_int;

/// Quality used when nothing better is known.
pub const DEFAULT_QUALITY: u32 = 1080;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

/// One playable variant before presentation shaping.
///
/// Missing fields are empty strings, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    /// Server label, falling back to the source's key
    pub server: String,
    /// Playable URL
    pub url: String,
    /// Raw provider `type` (`hls`, `dash`, `mp4`, ...)
    pub transport_type: String,
    /// Free-form speed hint (e.g., "fast")
    pub speed: String,
    /// Coarse bitrate hint (`FHD`, `HD`)
    pub bitrate_label: String,
    /// Quality label or `qualities` key (e.g., "1080p", "4K")
    pub quality_label: String,
}

impl SourceEntry {
    /// Vertical quality: bitrate hint first, then overridden by the quality
    /// label (as an integer if it is a bare resolution, else by keyword).
    pub fn resolve_quality(&self) -> u32 {
        let mut quality = DEFAULT_QUALITY;

        if !self.bitrate_label.is_empty() {
            let bitrate = self.bitrate_label.to_lowercase();
            if bitrate.contains("fhd") {
                quality = 1080;
            } else if bitrate.contains("hd") {
                quality = 720;
            }
        }

        if !self.quality_label.is_empty() {
            quality = resolution_number(&self.quality_label)
                .unwrap_or_else(|| quality_from_label(&self.quality_label));
        }

        quality
    }

    /// `"CinemaOS [server] bitrate speed"` with whitespace runs collapsed.
    pub fn display_name(&self, brand: &str) -> String {
        let raw = format!(
            "{brand} [{}] {} {}",
            self.server, self.bitrate_label, self.speed
        );
        WHITESPACE_RUN.replace_all(&raw, " ").trim().to_string()
    }
}

/// Integer resolution of a label like `"1080p"`, `"1440"` or `"720 HD"`.
///
/// The digits must be followed by the end of the label, `p`/`P` or
/// whitespace, so `"4K"` and `"8k"` are keywords, not numbers.
fn resolution_number(label: &str) -> Option<u32> {
    let digits = leading_int(label)?;
    let rest = label
        .trim_start()
        .trim_start_matches('+')
        .trim_start_matches(|c: char| c.is_ascii_digit());
    match rest.chars().next() {
        None => Some(digits),
        Some(c) if c == 'p' || c == 'P' || c.is_whitespace() => Some(digits),
        Some(_) => None,
    }
}

/// Map a free-form quality label to a vertical resolution.
///
/// First match wins: `4k`/`2160`, `fhd`/`1080`, `hd`/`720`, `480`/`sd`,
/// `360`. Anything else, including an empty label, is 1080.
pub fn quality_from_label(label: &str) -> u32 {
    let label = label.to_lowercase();
    let has = |needle: &str| label.contains(needle);

    if has("4k") || has("2160") {
        2160
    } else if has("fhd") || has("1080") {
        1080
    } else if has("hd") || has("720") {
        720
    } else if has("480") || has("sd") {
        480
    } else if has("360") {
        360
    } else {
        DEFAULT_QUALITY
    }
}

/// Parse decrypted plaintext, distinguishing malformed input.
pub fn try_normalize(plaintext: &str) -> Result<Vec<SourceEntry>> {
    let json: Value = serde_json::from_str(plaintext)?;
    let sources = json
        .get("sources")
        .and_then(Value::as_object)
        .ok_or_else(|| StreamError::MalformedPayload("no `sources` object".into()))?;

    let mut entries = Vec::new();
    for (key, source) in sources {
        let source = source.as_object().cloned().unwrap_or_default();
        let server = text_or(&source, "server", key);
        let speed = text(&source, "speed");
        let bitrate = text(&source, "bitrate");

        if let Some(qualities) = source.get("qualities").and_then(Value::as_object) {
            for (quality_key, quality) in qualities {
                let quality = quality.as_object().cloned().unwrap_or_default();
                entries.push(SourceEntry {
                    server: server.clone(),
                    url: text(&quality, "url"),
                    transport_type: text(&quality, "type"),
                    speed: speed.clone(),
                    bitrate_label: bitrate.clone(),
                    quality_label: quality_key.clone(),
                });
            }
        } else {
            entries.push(SourceEntry {
                server,
                url: text(&source, "url"),
                transport_type: text(&source, "type"),
                speed,
                bitrate_label: bitrate,
                quality_label: text(&source, "quality"),
            });
        }
    }

    debug!(count = entries.len(), "Normalized sources");
    Ok(entries)
}

/// Parse decrypted plaintext; malformed input logs and yields no entries.
pub fn normalize(plaintext: &str) -> Vec<SourceEntry> {
    try_normalize(plaintext).unwrap_or_else(|e| {
        warn!(stage = e.stage(), error = %e, "Could not parse sources");
        Vec::new()
    })
}

fn text(obj: &Map<String, Value>, field: &str) -> String {
    match obj.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn text_or(obj: &Map<String, Value>, field: &str, fallback: &str) -> String {
    let value = text(obj, field);
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
