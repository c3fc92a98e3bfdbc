//! Measurement units understood by the carrier API.

use serde::{Deserialize, Serialize};

/// Unit for parcel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    In,
    Cm,
}

impl DistanceUnit {
    /// Unit symbol as the carrier API spells it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Cm => "cm",
        }
    }
}

/// Unit for parcel weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    #[default]
    Lb,
    Oz,
    Kg,
    G,
}

impl MassUnit {
    /// Unit symbol as the carrier API spells it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lb => "lb",
            Self::Oz => "oz",
            Self::Kg => "kg",
            Self::G => "g",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_match_serde_names() {
        assert_eq!(
            serde_json::to_value(DistanceUnit::In).ok(),
            Some(serde_json::json!(DistanceUnit::In.as_str()))
        );
        assert_eq!(
            serde_json::to_value(MassUnit::Lb).ok(),
            Some(serde_json::json!(MassUnit::Lb.as_str()))
        );
    }
}
