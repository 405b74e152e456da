//! Engine configuration

use serde::{Deserialize, Serialize};

/// How a container learns that its viewport changed size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeSource {
    /// Registry polls outer sizes on window resize and writes resize markers
    #[default]
    Poll,
    /// Host sends `PlatformEvent::Resized` itself
    External,
}

/// Configuration for scrollbar geometry and behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollbarConfig {
    /// Smallest thumb size, as a percentage of the track
    pub min_thumb_percent: f32,
    /// Width of the band along each edge that triggers drag auto-scroll (px)
    pub edge_margin: f32,
    /// Auto-scroll retrigger delay per pixel of pointer displacement (ms)
    pub autoscroll_ms_per_px: f32,
    pub resize_source: ResizeSource,
}

impl Default for ScrollbarConfig {
    fn default() -> Self {
        Self {
            min_thumb_percent: 8.0,
            edge_margin: 40.0,
            autoscroll_ms_per_px: 10.0,
            resize_source: ResizeSource::Poll,
        }
    }
}

impl ScrollbarConfig {
    /// Config for hosts that report resizes themselves
    pub fn external_resize() -> Self {
        Self {
            resize_source: ResizeSource::External,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ScrollbarConfig = toml::from_str("min_thumb_percent = 12.5").unwrap();
        assert_eq!(config.min_thumb_percent, 12.5);
        assert_eq!(config.edge_margin, 40.0);
        assert_eq!(config.resize_source, ResizeSource::Poll);
    }

    #[test]
    fn test_resize_source_names() {
        let config: ScrollbarConfig = toml::from_str("resize_source = \"external\"").unwrap();
        assert_eq!(config, ScrollbarConfig::external_resize());
    }
}
