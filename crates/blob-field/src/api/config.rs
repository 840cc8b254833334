use serde::{Deserialize, Serialize};

use super::error::FieldError;
use crate::components::palette::{Rgb, YELLOW};

/// Viewport widths at or below this (CSS px) run the constrained mode.
pub const CONSTRAINED_BREAKPOINT_PX: f32 = 768.0;

/// Largest accepted `update_speed_factor`. Keeps each blob step within
/// the clamped frame delta.
pub const MAX_UPDATE_SPEED_FACTOR: f32 = 1.0;

/// Configuration for a blob field, fixed at scene construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldConfig {
    /// Number of blobs in the scene.
    pub blob_count: usize,
    /// Multiplier applied to the frame delta before each blob update.
    pub update_speed_factor: f32,
    /// Colours assigned to blobs round-robin by index.
    pub palette: Vec<Rgb>,
}

impl FieldConfig {
    /// Parse a config from a JSON string, then validate it.
    pub fn from_json(json: &str) -> Result<Self, FieldError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        if self.blob_count > 0 && self.palette.is_empty() {
            return Err(FieldError::InvalidConfig(
                "palette must contain at least one colour".into(),
            ));
        }
        // Above 1 the blob step exceeds the frame cap and the point easing diverges
        if !(0.0..=MAX_UPDATE_SPEED_FACTOR).contains(&self.update_speed_factor) {
            return Err(FieldError::InvalidConfig(format!(
                "update speed factor must be within 0..=1, got {}",
                self.update_speed_factor
            )));
        }
        Ok(())
    }

    /// Replace the palette.
    pub fn with_palette(mut self, palette: &[Rgb]) -> Self {
        self.palette = palette.to_vec();
        self
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldMode::Full.config()
    }
}

/// Presentation mode. Constrained trades blob count and motion speed for
/// cheaper frames on small or low-power displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldMode {
    Full,
    Constrained,
}

impl FieldMode {
    /// Pick a mode from the viewport width.
    pub fn for_viewport_width(width: f32) -> Self {
        if width <= CONSTRAINED_BREAKPOINT_PX {
            FieldMode::Constrained
        } else {
            FieldMode::Full
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "full" => Some(FieldMode::Full),
            "constrained" => Some(FieldMode::Constrained),
            _ => None,
        }
    }

    /// The preset config for this mode, using the yellow palette.
    pub fn config(self) -> FieldConfig {
        let (blob_count, update_speed_factor) = match self {
            FieldMode::Full => (5, 0.15),
            FieldMode::Constrained => (3, 0.10),
        };
        FieldConfig {
            blob_count,
            update_speed_factor,
            palette: YELLOW.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_presets() {
        let full = FieldMode::Full.config();
        assert_eq!(full.blob_count, 5);
        assert_eq!(full.update_speed_factor, 0.15);

        let constrained = FieldMode::Constrained.config();
        assert_eq!(constrained.blob_count, 3);
        assert_eq!(constrained.update_speed_factor, 0.10);
        assert_eq!(constrained.palette.len(), 5);
    }

    #[test]
    fn mode_from_viewport() {
        assert_eq!(FieldMode::for_viewport_width(375.0), FieldMode::Constrained);
        assert_eq!(FieldMode::for_viewport_width(768.0), FieldMode::Constrained);
        assert_eq!(FieldMode::for_viewport_width(1280.0), FieldMode::Full);
    }

    #[test]
    fn parse_camel_case_json() {
        let json = r#"{
            "blobCount": 1,
            "updateSpeedFactor": 0.15,
            "palette": [{ "r": 255, "g": 0, "b": 0 }]
        }"#;
        let config = FieldConfig::from_json(json).unwrap();
        assert_eq!(config.blob_count, 1);
        assert_eq!(config.palette, vec![Rgb::RED]);
    }

    #[test]
    fn unknown_option_rejected() {
        let json = r#"{"blobCount":1,"updateSpeedFactor":0.1,"palette":[],"blur":20}"#;
        assert!(matches!(
            FieldConfig::from_json(json),
            Err(FieldError::ConfigParse(_))
        ));
    }

    #[test]
    fn empty_palette_rejected() {
        let config = FieldConfig {
            blob_count: 2,
            update_speed_factor: 0.1,
            palette: Vec::new(),
        };
        assert!(matches!(config.validate(), Err(FieldError::InvalidConfig(_))));

        // No blobs, no colours needed
        let empty = FieldConfig { blob_count: 0, ..config };
        assert!(empty.validate().is_ok());
    }

    #[test]
    fn bad_speed_factor_rejected() {
        let config = FieldConfig {
            update_speed_factor: f32::NAN,
            ..FieldConfig::default()
        };
        assert!(config.validate().is_err());
        let config = FieldConfig {
            update_speed_factor: -0.1,
            ..FieldConfig::default()
        };
        assert!(config.validate().is_err());
        let config = FieldConfig {
            update_speed_factor: 40.0,
            ..FieldConfig::default()
        };
        assert!(matches!(config.validate(), Err(FieldError::InvalidConfig(_))));
        assert!(FieldConfig::from_json(
            r#"{"blobCount": 1, "updateSpeedFactor": 40.0, "palette": [{"r": 255, "g": 0, "b": 0}]}"#
        )
        .is_err());
    }

    #[test]
    fn speed_factor_range_is_inclusive() {
        for factor in [0.0, MAX_UPDATE_SPEED_FACTOR] {
            let config = FieldConfig {
                update_speed_factor: factor,
                ..FieldConfig::default()
            };
            assert!(config.validate().is_ok(), "factor {}", factor);
        }
    }
}
