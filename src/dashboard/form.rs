use crate::dashboard::DashboardError;
use crate::models::{whole_number, AccessType, BathroomLocation, Condition, FeatureRow, Furnished};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const AREA_RANGE: RangeInclusive<u32> = 20..=200;
pub const ROOM_RANGE: RangeInclusive<u32> = 1..=6;

pub const DEFAULT_AREA: u32 = 80;
pub const DEFAULT_ROOMS: u32 = 2;

/// Form values as received in the query string. Missing or blank fields take
/// the form's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureInput {
    pub neighborhood: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    pub area_sqm: Option<u32>,
    #[serde(default, deserialize_with = "whole_number")]
    pub room_count: Option<u32>,
    pub bathroom_location: Option<BathroomLocation>,
    pub access_type: Option<AccessType>,
    pub furnished: Option<Furnished>,
    pub condition: Option<Condition>,
}

impl FeatureInput {
    /// Validate against the form ranges and the known neighborhoods.
    ///
    /// Without an explicit neighborhood the first choice is used.
    pub fn into_feature_row(self, neighborhoods: &[String]) -> Result<FeatureRow, DashboardError> {
        let area_sqm = self.area_sqm.unwrap_or(DEFAULT_AREA);
        if !AREA_RANGE.contains(&area_sqm) {
            return Err(DashboardError::InvalidInput(format!(
                "area_sqm must be between {} and {}, got {}",
                AREA_RANGE.start(),
                AREA_RANGE.end(),
                area_sqm
            )));
        }

        let room_count = self.room_count.unwrap_or(DEFAULT_ROOMS);
        if !ROOM_RANGE.contains(&room_count) {
            return Err(DashboardError::InvalidInput(format!(
                "room_count must be between {} and {}, got {}",
                ROOM_RANGE.start(),
                ROOM_RANGE.end(),
                room_count
            )));
        }

        let neighborhood = match self.neighborhood.filter(|n| !n.trim().is_empty()) {
            Some(name) if neighborhoods.iter().any(|n| n == &name) => name,
            Some(name) => {
                return Err(DashboardError::InvalidInput(format!(
                    "unknown neighborhood '{}'",
                    name
                )))
            }
            None => neighborhoods.first().cloned().ok_or_else(|| {
                DashboardError::InvalidInput("no neighborhood available".to_string())
            })?,
        };

        Ok(FeatureRow::new(
            neighborhood,
            area_sqm,
            room_count,
            self.bathroom_location.unwrap_or(BathroomLocation::Interior),
            self.access_type.unwrap_or_default(),
            self.furnished.unwrap_or(Furnished::Yes),
            self.condition.unwrap_or(Condition::Poor),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<String> {
        vec!["Analakely".to_string(), "Isoraka".to_string()]
    }

    #[test]
    fn test_defaults() {
        let row = FeatureInput::default().into_feature_row(&choices()).unwrap();
        assert_eq!(row.neighborhood, "Analakely");
        assert_eq!(row.area_sqm, 80);
        assert_eq!(row.room_count, 2);
        assert_eq!(row.area_per_room, 40.0);
        assert_eq!(row.access_type, AccessType::None);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let input = FeatureInput {
            area_sqm: Some(250),
            ..Default::default()
        };
        assert!(matches!(
            input.into_feature_row(&choices()),
            Err(DashboardError::InvalidInput(_))
        ));

        let input = FeatureInput {
            room_count: Some(0),
            ..Default::default()
        };
        assert!(input.into_feature_row(&choices()).is_err());
    }

    #[test]
    fn test_rejects_unknown_neighborhood() {
        let input = FeatureInput {
            neighborhood: Some("Paris".to_string()),
            ..Default::default()
        };
        assert!(input.into_feature_row(&choices()).is_err());
        assert!(FeatureInput::default().into_feature_row(&[]).is_err());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let input = FeatureInput {
            neighborhood: Some("Isoraka".to_string()),
            area_sqm: Some(200),
            room_count: Some(6),
            ..Default::default()
        };
        let row = input.into_feature_row(&choices()).unwrap();
        assert_eq!(row.neighborhood, "Isoraka");
        assert_eq!(row.area_per_room, 200.0 / 6.0);
    }
}
