use serde::{Deserialize, Serialize};

/// Severity bucket the backend assigns to a sampled point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatZone {
    Low,
    Medium,
    High,
}

impl HeatZone {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Low),
            1 => Some(Self::Medium),
            2 => Some(Self::High),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low heat",
            Self::Medium => "Medium heat",
            Self::High => "High heat",
        }
    }

    /// Fallback guidance when the backend sends no recommendation text.
    pub const fn guidance(self) -> &'static str {
        match self {
            Self::Low => "Within normal range; no mitigation needed",
            Self::Medium => "Elevated heat; consider shade cover and reflective surfaces",
            Self::High => "Heat island hotspot; prioritize tree canopy and cool roofing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_wire_values_case_insensitively() {
        assert_eq!(HeatZone::parse("high"), Some(HeatZone::High));
        assert_eq!(HeatZone::parse(" Medium "), Some(HeatZone::Medium));
        assert_eq!(HeatZone::parse("LOW"), Some(HeatZone::Low));
        assert_eq!(HeatZone::parse("extreme"), None);
    }

    #[test]
    fn index_round_trips_in_severity_order() {
        for (index, zone) in HeatZone::ALL.iter().enumerate() {
            assert_eq!(HeatZone::from_index(index), Some(*zone));
        }
        assert_eq!(HeatZone::from_index(3), None);
    }

    #[test]
    fn serde_uses_lowercase_wire_form() {
        let json = serde_json::to_string(&HeatZone::High).unwrap();
        assert_eq!(json, "\"high\"");
        let zone: HeatZone = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(zone, HeatZone::Medium);
    }
}
