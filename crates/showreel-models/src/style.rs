//! Vehicle style definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Vehicle presentation styles used to pick transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStyle {
    Luxury,
    Sporty,
    Family,
    Adventure,
    Eco,
}

impl VehicleStyle {
    pub const ALL: &'static [VehicleStyle] = &[
        VehicleStyle::Luxury,
        VehicleStyle::Sporty,
        VehicleStyle::Family,
        VehicleStyle::Adventure,
        VehicleStyle::Eco,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStyle::Luxury => "luxury",
            VehicleStyle::Sporty => "sporty",
            VehicleStyle::Family => "family",
            VehicleStyle::Adventure => "adventure",
            VehicleStyle::Eco => "eco",
        }
    }

    /// Resolve a free-form style tag, falling back to `Family` for anything unknown.
    pub fn from_tag_or_default(tag: &str) -> Self {
        match tag.parse::<VehicleStyle>() {
            Ok(style) => style,
            Err(_) => VehicleStyle::Family,
        }
    }
}

impl fmt::Display for VehicleStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VehicleStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "luxury" => Ok(VehicleStyle::Luxury),
            "sporty" => Ok(VehicleStyle::Sporty),
            "family" => Ok(VehicleStyle::Family),
            "adventure" => Ok(VehicleStyle::Adventure),
            "eco" => Ok(VehicleStyle::Eco),
            _ => Err(StyleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown vehicle style: {0}")]
pub struct StyleParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_roundtrip_names() {
        for style in VehicleStyle::ALL {
            assert_eq!(style.as_str().parse::<VehicleStyle>().unwrap(), *style);
        }
    }

    #[test]
    fn test_unknown_tag_defaults_to_family() {
        assert_eq!(VehicleStyle::from_tag_or_default("muscle"), VehicleStyle::Family);
        assert_eq!(VehicleStyle::from_tag_or_default(""), VehicleStyle::Family);
        assert_eq!(VehicleStyle::from_tag_or_default(" Luxury "), VehicleStyle::Luxury);
    }
}
