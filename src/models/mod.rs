use chrono::{DateTime, Local};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel stored in text fields the extractor could not fill
pub const UNSPECIFIED: &str = "unspecified";

/// Where the bathroom / toilet is located relative to the dwelling
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BathroomLocation {
    #[serde(rename = "interieur", alias = "interior", alias = "intérieur")]
    Interior,
    #[serde(rename = "exterieur", alias = "exterior", alias = "extérieur")]
    Exterior,
}

/// How the dwelling can be reached
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessType {
    #[default]
    #[serde(rename = "sans", alias = "none")]
    None,
    #[serde(rename = "moto", alias = "motorbike")]
    Motorbike,
    #[serde(rename = "voiture", alias = "car")]
    Car,
    #[serde(rename = "voiture_avec_par_parking", alias = "car_with_parking")]
    CarWithParking,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Furnished {
    #[serde(rename = "oui", alias = "yes")]
    Yes,
    #[default]
    #[serde(rename = "non", alias = "no")]
    No,
}

/// General state of the dwelling. Ordering goes from worst to best.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Condition {
    #[serde(rename = "mauvais", alias = "poor")]
    Poor,
    #[serde(rename = "moyen", alias = "average")]
    Average,
    #[serde(rename = "bon", alias = "good")]
    Good,
}

impl BathroomLocation {
    pub const ALL: [BathroomLocation; 2] = [BathroomLocation::Interior, BathroomLocation::Exterior];

    /// Value used in CSV files, the model artifact and query strings
    pub fn as_wire(&self) -> &'static str {
        match self {
            BathroomLocation::Interior => "interieur",
            BathroomLocation::Exterior => "exterieur",
        }
    }
}

impl AccessType {
    pub const ALL: [AccessType; 4] = [
        AccessType::None,
        AccessType::Motorbike,
        AccessType::Car,
        AccessType::CarWithParking,
    ];

    pub fn as_wire(&self) -> &'static str {
        match self {
            AccessType::None => "sans",
            AccessType::Motorbike => "moto",
            AccessType::Car => "voiture",
            AccessType::CarWithParking => "voiture_avec_par_parking",
        }
    }
}

impl Furnished {
    pub const ALL: [Furnished; 2] = [Furnished::Yes, Furnished::No];

    pub fn as_wire(&self) -> &'static str {
        match self {
            Furnished::Yes => "oui",
            Furnished::No => "non",
        }
    }
}

impl Condition {
    /// Display order used by the dashboard: worst first
    pub const ALL: [Condition; 3] = [Condition::Poor, Condition::Average, Condition::Good];

    pub fn as_wire(&self) -> &'static str {
        match self {
            Condition::Poor => "mauvais",
            Condition::Average => "moyen",
            Condition::Good => "bon",
        }
    }
}

macro_rules! display_as_wire {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_wire())
            }
        })*
    };
}

display_as_wire!(BathroomLocation, AccessType, Furnished, Condition);

/// One parsed marketplace listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRecord {
    pub title: String,
    pub neighborhood: String,
    pub area_sqm: Option<u32>,
    pub room_count: Option<u32>,
    pub bathroom_location: Option<BathroomLocation>,
    pub access_type: AccessType,
    pub furnished: Furnished,
    pub condition: Option<Condition>,
    pub monthly_rent: Option<i64>,
    pub description: String,
    pub source_link: String,
    pub extracted_at: DateTime<Local>,
}

/// The eight structured columns shared by the collector output and the
/// dashboard's reference dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    #[serde(rename = "quartier")]
    pub neighborhood: String,
    #[serde(rename = "superficie", default, deserialize_with = "whole_number")]
    pub area_sqm: Option<u32>,
    #[serde(rename = "nombre_chambres", default, deserialize_with = "whole_number")]
    pub room_count: Option<u32>,
    #[serde(rename = "douche_wc")]
    pub bathroom_location: Option<BathroomLocation>,
    #[serde(rename = "type_d_acces")]
    pub access_type: Option<AccessType>,
    #[serde(rename = "meublé", alias = "meuble")]
    pub furnished: Option<Furnished>,
    #[serde(rename = "etat_general", alias = "état_général")]
    pub condition: Option<Condition>,
    #[serde(rename = "loyer_mensuel", default, deserialize_with = "whole_number")]
    pub monthly_rent: Option<i64>,
}

impl From<&ListingRecord> for ReferenceRow {
    fn from(record: &ListingRecord) -> Self {
        Self {
            neighborhood: record.neighborhood.clone(),
            area_sqm: record.area_sqm,
            room_count: record.room_count,
            bathroom_location: record.bathroom_location,
            access_type: Some(record.access_type),
            furnished: Some(record.furnished),
            condition: record.condition,
            monthly_rent: record.monthly_rent,
        }
    }
}

/// Deserializes an optional whole number written either as an integer or as
/// an integral float ("80" or "80.0"). Blank values are `None`.
pub fn whole_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<i64>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) => parse_whole_number(&text).map_err(de::Error::custom),
        None => Ok(None),
    }
}

pub fn parse_whole_number<T>(text: &str) -> Result<Option<T>, String>
where
    T: FromStr + TryFrom<i64>,
{
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if let Ok(value) = text.parse::<T>() {
        return Ok(Some(value));
    }

    let value: f64 = text
        .parse()
        .map_err(|_| format!("'{}' is not a number", text))?;
    // 2^63 is the first float past i64::MAX
    if !value.is_finite() || value.fract() != 0.0 || value.abs() >= 9_223_372_036_854_775_808.0 {
        return Err(format!("'{}' is not a whole number", text));
    }
    T::try_from(value as i64)
        .map(Some)
        .map_err(|_| format!("'{}' is out of range", text))
}

/// Model input built from the dashboard form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub neighborhood: String,
    pub area_sqm: u32,
    pub room_count: u32,
    pub bathroom_location: BathroomLocation,
    pub access_type: AccessType,
    pub furnished: Furnished,
    pub condition: Condition,
    pub area_per_room: f64,
}

impl FeatureRow {
    /// Builds a row and derives `area_per_room`. `room_count` must be non-zero.
    pub fn new(
        neighborhood: impl Into<String>,
        area_sqm: u32,
        room_count: u32,
        bathroom_location: BathroomLocation,
        access_type: AccessType,
        furnished: Furnished,
        condition: Condition,
    ) -> Self {
        Self {
            neighborhood: neighborhood.into(),
            area_sqm,
            room_count,
            bathroom_location,
            access_type,
            furnished,
            condition,
            area_per_room: area_sqm as f64 / room_count.max(1) as f64,
        }
    }
}
