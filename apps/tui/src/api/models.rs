use serde::{Deserialize, Serialize};

use crate::domain::HeatZone;

/// One geocoded sample produced by the backend analysis run.
///
/// `recommendation` is absent on older backend builds; display code falls
/// back to [`HeatZone::guidance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: f64,
    pub zone: HeatZone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl SamplePoint {
    pub fn recommendation_text(&self) -> &str {
        self.recommendation
            .as_deref()
            .unwrap_or_else(|| self.zone.guidance())
    }
}

/// Per-zone counts accompanying a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZoneStatistics {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl ZoneStatistics {
    pub fn tally(points: &[SamplePoint]) -> Self {
        let mut stats = Self::default();
        for point in points {
            match point.zone {
                HeatZone::Low => stats.low += 1,
                HeatZone::Medium => stats.medium += 1,
                HeatZone::High => stats.high += 1,
            }
        }
        stats
    }

    pub const fn count(&self, zone: HeatZone) -> u64 {
        match zone {
            HeatZone::Low => self.low,
            HeatZone::Medium => self.medium,
            HeatZone::High => self.high,
        }
    }

    pub const fn total(&self) -> u64 {
        self.low + self.medium + self.high
    }

    pub fn share(&self, zone: HeatZone) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.count(zone) as f64 / total as f64
        }
    }
}

/// Wire payload of `GET /api/analyze/uhi`.
///
/// The current backend sends the counts under `statistics`; the original
/// Flask service called the same field `summary`, so both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub days: Option<i64>,
    #[serde(default)]
    pub data: Vec<SamplePoint>,
    #[serde(default, alias = "summary")]
    pub statistics: Option<ZoneStatistics>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Document written by the export action.
#[derive(Debug, Serialize)]
pub struct AnalysisExport<'a> {
    pub data: &'a [SamplePoint],
    pub statistics: &'a ZoneStatistics,
    #[serde(rename = "exportedAt")]
    pub exported_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(zone: HeatZone) -> SamplePoint {
        SamplePoint {
            latitude: 20.3,
            longitude: 85.8,
            temperature: 36.5,
            zone,
            recommendation: None,
        }
    }

    #[test]
    fn tally_counts_each_zone() {
        let points = vec![
            point(HeatZone::Low),
            point(HeatZone::High),
            point(HeatZone::High),
            point(HeatZone::Medium),
        ];
        let stats = ZoneStatistics::tally(&points);
        assert_eq!(stats.low, 1);
        assert_eq!(stats.medium, 1);
        assert_eq!(stats.high, 2);
        assert_eq!(stats.total(), 4);
    }

    #[test]
    fn share_of_empty_statistics_is_zero() {
        let stats = ZoneStatistics::default();
        assert!(stats.share(HeatZone::High).abs() < f64::EPSILON);
    }

    #[test]
    fn decodes_current_backend_payload() {
        let body = r#"{
            "success": true,
            "points": 2,
            "days": 30,
            "statistics": {"high": 1, "medium": 0, "low": 1},
            "data": [
                {"latitude": 20.31, "longitude": 85.81, "temperature": 41.2,
                 "zone": "high", "recommendation": "Add canopy cover"},
                {"latitude": 20.28, "longitude": 85.83, "temperature": 30.1,
                 "zone": "low"}
            ]
        }"#;

        let response: AnalysisResponse = serde_json::from_str(body).unwrap();
        assert!(response.success);
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].zone, HeatZone::High);
        assert_eq!(
            response.data[0].recommendation_text(),
            "Add canopy cover"
        );
        assert_eq!(response.data[1].recommendation, None);
        assert_eq!(
            response.data[1].recommendation_text(),
            HeatZone::Low.guidance()
        );
        let stats = response.statistics.unwrap();
        assert_eq!(stats.high, 1);
        assert_eq!(stats.low, 1);
    }

    #[test]
    fn decodes_legacy_summary_alias() {
        let body = r#"{
            "success": true,
            "summary": {"high": 0, "medium": 2, "low": 0},
            "data": []
        }"#;

        let response: AnalysisResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.statistics.unwrap().medium, 2);
    }

    #[test]
    fn export_document_uses_camel_case_timestamp_key() {
        let data = vec![point(HeatZone::Medium)];
        let statistics = ZoneStatistics::tally(&data);
        let export = AnalysisExport {
            data: &data,
            statistics: &statistics,
            exported_at: "2026-08-06T12:00:00+00:00".to_string(),
        };

        let json = serde_json::to_value(&export).unwrap();
        assert!(json.get("exportedAt").is_some());
        assert_eq!(json["statistics"]["medium"], 1);
        assert_eq!(json["data"][0]["zone"], "medium");
    }
}
