//! Static descriptors for color models and their channels.
//!
//! Every model publishes one `&'static` [`ModelMeta`]. The descriptor drives
//! slice validation ([`ModelMeta::validate`]), channel lookup by name and the
//! markdown table emitted by [`ModelMeta::doc`]. Both types derive
//! `Serialize` so documentation generators can dump them as JSON.

use std::fmt::Write as _;

use gfx_core::{Error, Result};
use serde::Serialize;

/// Slack allowed past a channel bound before a value is rejected.
const RANGE_SLACK: f64 = 1e-6;

/// One channel of a color model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelMeta {
    /// Channel name, e.g. "Hue"
    pub name: &'static str,
    /// Inclusive lower bound
    pub min: f64,
    /// Inclusive upper bound
    pub max: f64,
    /// Unit label ("", "deg", "nm", "%")
    pub unit: &'static str,
    /// Short description
    pub description: &'static str,
}

impl ChannelMeta {
    /// Const constructor.
    pub const fn new(name: &'static str, min: f64, max: f64, unit: &'static str, description: &'static str) -> Self {
        Self {
            name,
            min,
            max,
            unit,
            description,
        }
    }

    /// Standard [0, 1] alpha channel.
    pub const fn alpha() -> Self {
        Self::new("Alpha", 0.0, 1.0, "", "Opacity, 0 transparent to 1 opaque")
    }

    /// Returns `true` if `v` is finite and inside the bounds (with float slack).
    pub fn accepts(&self, v: f64) -> bool {
        let slack = RANGE_SLACK * (self.max - self.min).abs().max(1.0);
        v.is_finite() && v >= self.min - slack && v <= self.max + slack
    }
}

/// Descriptor of a color model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelMeta {
    /// Canonical identifier used by the registry
    pub name: &'static str,
    /// Human readable description
    pub description: &'static str,
    /// Channels in slice order
    pub channels: &'static [ChannelMeta],
}

impl ModelMeta {
    /// Number of channels, alpha included.
    #[inline]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Always `false`; every model has at least one channel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Position of a channel, compared case-insensitively.
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.channels.iter().position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Checks slice length and per-channel ranges.
    pub fn validate(&self, values: &[f64]) -> Result<()> {
        if values.len() != self.channels.len() {
            return Err(Error::invalid_argument(format!(
                "{} expects {} channels, got {}",
                self.name,
                self.channels.len(),
                values.len()
            )));
        }
        for (ch, &v) in self.channels.iter().zip(values) {
            if !ch.accepts(v) {
                return Err(Error::invalid_argument(format!(
                    "{}.{} = {v} outside [{}, {}]",
                    self.name, ch.name, ch.min, ch.max
                )));
            }
        }
        Ok(())
    }

    /// Markdown section describing the model.
    pub fn doc(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "## {}\n\n{}\n", self.name, self.description);
        let _ = writeln!(out, "| Channel | Min | Max | Unit | Description |");
        let _ = writeln!(out, "|---|---|---|---|---|");
        for c in self.channels {
            let _ = writeln!(out, "| {} | {} | {} | {} | {} |", c.name, c.min, c.max, c.unit, c.description);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: ModelMeta = ModelMeta {
        name: "Demo",
        description: "Two channel demo",
        channels: &[ChannelMeta::new("Level", 0.0, 10.0, "", "level"), ChannelMeta::alpha()],
    };

    #[test]
    fn test_validate() {
        assert!(DEMO.validate(&[5.0, 1.0]).is_ok());
        assert!(DEMO.validate(&[10.000001, 1.0]).is_ok());
        assert!(DEMO.validate(&[11.0, 1.0]).unwrap_err().is_invalid_argument());
        assert!(DEMO.validate(&[5.0]).is_err());
        assert!(DEMO.validate(&[f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_channel_index() {
        assert_eq!(DEMO.channel_index("alpha"), Some(1));
        assert_eq!(DEMO.channel_index("LEVEL"), Some(0));
        assert_eq!(DEMO.channel_index("x"), None);
    }

    #[test]
    fn test_doc_table() {
        let doc = DEMO.doc();
        assert!(doc.starts_with("## Demo"));
        assert!(doc.contains("| Level | 0 | 10 |"));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(DEMO).unwrap();
        assert_eq!(json["name"], "Demo");
        assert_eq!(json["channels"][1]["name"], "Alpha");
    }
}
