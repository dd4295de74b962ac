//! Turns the free text of a marketplace listing into a [`ListingRecord`].
//!
//! Every function here is pure and infallible: a pattern that is missing from
//! the text is reported as `None` (or the [`UNSPECIFIED`] sentinel), never as
//! an error.

mod keywords;

use crate::models::{
    AccessType, BathroomLocation, Condition, Furnished, ListingRecord, UNSPECIFIED,
};
use chrono::Local;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

pub use keywords::DEFAULT_KNOWN_NEIGHBORHOODS;

/// Number followed by a square-meter marker: "80m2", "80 m²", "80 m 2"
static AREA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*(?:m²|m2|m\s*2)").unwrap());

/// Number followed by "chambre" or one of its abbreviations
static ROOM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*(?:chambre|chbr|chb|ch)").unwrap());

/// Raw text read from one listing's detail view
#[derive(Debug, Clone, Default)]
pub struct RawListing {
    pub title: Option<String>,
    pub price_text: Option<String>,
    pub location_candidates: Vec<String>,
    pub description: Option<String>,
    pub link: String,
}

/// Extractor configured with the set of neighborhoods it recognizes
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    known_neighborhoods: Vec<String>,
}

impl ListingExtractor {
    pub fn new<I, S>(known_neighborhoods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            known_neighborhoods: known_neighborhoods
                .into_iter()
                .map(|n| n.as_ref().trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// Build the structured record for one listing
    pub fn extract(&self, raw: &RawListing) -> ListingRecord {
        let title = raw
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNSPECIFIED)
            .to_string();

        let description = raw
            .description
            .as_deref()
            .map(|d| d.to_lowercase())
            .filter(|d| !d.trim().is_empty());

        let text = description.as_deref().unwrap_or("");

        let record = ListingRecord {
            title,
            neighborhood: extract_neighborhood(&raw.location_candidates, &self.known_neighborhoods),
            area_sqm: extract_area(text),
            room_count: extract_room_count(text),
            bathroom_location: extract_bathroom_location(text),
            access_type: extract_access_type(text),
            furnished: extract_furnished(text),
            condition: extract_condition(text),
            monthly_rent: raw.price_text.as_deref().and_then(extract_price),
            description: description.clone().unwrap_or_else(|| UNSPECIFIED.to_string()),
            source_link: raw.link.clone(),
            extracted_at: Local::now(),
        };

        debug!(
            "Extracted listing '{}': area={:?} rooms={:?} rent={:?}",
            record.title, record.area_sqm, record.room_count, record.monthly_rent
        );

        record
    }
}

impl Default for ListingExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_KNOWN_NEIGHBORHOODS)
    }
}

/// Returns the first candidate that contains a known neighborhood name
/// (case-insensitive). The candidate text itself is returned, not the name.
pub fn extract_neighborhood<S: AsRef<str>, K: AsRef<str>>(
    candidate_texts: &[S],
    known_neighborhoods: &[K],
) -> String {
    for candidate in candidate_texts {
        let text = candidate.as_ref().trim();
        let lowered = text.to_lowercase();
        let matched = known_neighborhoods.iter().any(|known| {
            let known = known.as_ref().trim().to_lowercase();
            !known.is_empty() && lowered.contains(&known)
        });
        if matched {
            return text.to_string();
        }
    }
    UNSPECIFIED.to_string()
}

/// Concatenates every ASCII digit of `price_text` into an integer
pub fn extract_price(price_text: &str) -> Option<i64> {
    let digits: String = price_text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

pub fn extract_area(description: &str) -> Option<u32> {
    first_number(&AREA_PATTERN, description)
}

pub fn extract_room_count(description: &str) -> Option<u32> {
    first_number(&ROOM_PATTERN, description)
}

pub fn extract_bathroom_location(description: &str) -> Option<BathroomLocation> {
    if !contains_any(description, keywords::BATHROOM) {
        return None;
    }
    if contains_any(description, keywords::INTERIOR) {
        Some(BathroomLocation::Interior)
    } else {
        Some(BathroomLocation::Exterior)
    }
}

/// parking > car > motorbike > none
pub fn extract_access_type(description: &str) -> AccessType {
    first_rule(description, keywords::ACCESS_RULES).unwrap_or_default()
}

pub fn extract_furnished(description: &str) -> Furnished {
    if contains_any(description, keywords::FURNISHED) {
        Furnished::Yes
    } else {
        Furnished::No
    }
}

/// good > average > poor, regardless of where the words appear in the text
pub fn extract_condition(description: &str) -> Option<Condition> {
    first_rule(description, keywords::CONDITION_RULES)
}

fn first_number(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Evaluates an ordered `(keywords, result)` table top-down
fn first_rule<T: Copy>(text: &str, rules: &[(&[&str], T)]) -> Option<T> {
    rules
        .iter()
        .find(|(needles, _)| contains_any(text, needles))
        .map(|(_, result)| *result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_concatenates_digits() {
        assert_eq!(extract_price("350 000 MGA"), Some(350_000));
        assert_eq!(extract_price("Ar 1.200.000 / mois"), Some(1_200_000));
        assert_eq!(extract_price("MGA"), None);
        assert_eq!(extract_price(""), None);
    }

    #[test]
    fn test_price_overflow_is_none() {
        assert_eq!(extract_price("99999999999999999999999"), None);
    }

    #[test]
    fn test_area_variants() {
        assert_eq!(extract_area("surface 45 m2 environ"), Some(45));
        assert_eq!(extract_area("120m²"), Some(120));
        assert_eq!(extract_area("de 60 m 2 habitables"), Some(60));
        assert_eq!(extract_area("grand terrain"), None);
    }

    #[test]
    fn test_area_takes_first_match() {
        assert_eq!(extract_area("salon 20m2, total 85 m2"), Some(20));
    }

    #[test]
    fn test_room_count_variants() {
        assert_eq!(extract_room_count("maison 4 chambres"), Some(4));
        assert_eq!(extract_room_count("2chbr + salon"), Some(2));
        assert_eq!(extract_room_count("3 ch, 1 sdb"), Some(3));
        assert_eq!(extract_room_count("studio"), None);
    }

    #[test]
    fn test_bathroom_location() {
        assert_eq!(
            extract_bathroom_location("salle de bain intérieure"),
            Some(BathroomLocation::Interior)
        );
        assert_eq!(
            extract_bathroom_location("sdb int. avec eau chaude"),
            Some(BathroomLocation::Interior)
        );
        assert_eq!(
            extract_bathroom_location("sdb commune dans la cour"),
            Some(BathroomLocation::Exterior)
        );
        assert_eq!(extract_bathroom_location("intérieur refait"), None);
    }

    #[test]
    fn test_access_precedence() {
        assert_eq!(
            extract_access_type("accès moto, parking disponible"),
            AccessType::CarWithParking
        );
        assert_eq!(extract_access_type("accès voiture et moto"), AccessType::Car);
        assert_eq!(extract_access_type("accès moto"), AccessType::Motorbike);
        assert_eq!(extract_access_type("ruelle piétonne"), AccessType::None);
    }

    #[test]
    fn test_furnished() {
        assert_eq!(extract_furnished("studio meublé"), Furnished::Yes);
        assert_eq!(extract_furnished("cuisine fournie"), Furnished::Yes);
        assert_eq!(extract_furnished("vide"), Furnished::No);
    }

    #[test]
    fn test_condition_order_ignores_position() {
        assert_eq!(extract_condition("état moyen mais cuisine neuve"), Some(Condition::Good));
        assert_eq!(extract_condition("neuf, quartier moyen"), Some(Condition::Good));
        assert_eq!(extract_condition("bien entretenu"), Some(Condition::Good));
        assert_eq!(extract_condition("standing moyen"), Some(Condition::Average));
        assert_eq!(extract_condition("maison à rénover"), Some(Condition::Poor));
        assert_eq!(extract_condition("belle vue"), None);
    }

    #[test]
    fn test_neighborhood_returns_candidate_text() {
        let known = ["analakely", "isoraka"];
        assert_eq!(
            extract_neighborhood(&["foo Analakely bar"], &known),
            "foo Analakely bar"
        );
    }

    #[test]
    fn test_neighborhood_first_candidate_wins() {
        let known = ["analakely", "isoraka"];
        let candidates = ["Il y a 2 jours", "Isoraka, Antananarivo", "Analakely"];
        assert_eq!(extract_neighborhood(&candidates, &known), "Isoraka, Antananarivo");
        assert_eq!(extract_neighborhood(&["Toamasina"], &known), UNSPECIFIED);
        let none: [&str; 0] = [];
        assert_eq!(extract_neighborhood(&none, &known), UNSPECIFIED);
    }

    #[test]
    fn test_extract_full_listing() {
        let extractor = ListingExtractor::default();
        let raw = RawListing {
            title: Some("  Appartement à louer ".to_string()),
            price_text: Some("350 000 MGA".to_string()),
            location_candidates: vec!["Antananarivo".to_string(), "Andraharo, Tana".to_string()],
            description: Some(
                "Bel appartement meublé de 3 chambres, 80m2, avec parking, bon état, salle de bain intérieure"
                    .to_string(),
            ),
            link: "https://www.facebook.com/marketplace/item/42".to_string(),
        };

        let record = extractor.extract(&raw);
        assert_eq!(record.title, "Appartement à louer");
        assert_eq!(record.neighborhood, "Andraharo, Tana");
        assert_eq!(record.area_sqm, Some(80));
        assert_eq!(record.room_count, Some(3));
        assert_eq!(record.furnished, Furnished::Yes);
        assert_eq!(record.access_type, AccessType::CarWithParking);
        assert_eq!(record.condition, Some(Condition::Good));
        assert_eq!(record.bathroom_location, Some(BathroomLocation::Interior));
        assert_eq!(record.monthly_rent, Some(350_000));
        assert!(record.description.starts_with("bel appartement"));
    }

    #[test]
    fn test_extract_empty_listing_uses_sentinels() {
        let record = ListingExtractor::default().extract(&RawListing::default());
        assert_eq!(record.title, UNSPECIFIED);
        assert_eq!(record.neighborhood, UNSPECIFIED);
        assert_eq!(record.description, UNSPECIFIED);
        assert_eq!(record.area_sqm, None);
        assert_eq!(record.access_type, AccessType::None);
        assert_eq!(record.furnished, Furnished::No);
        assert_eq!(record.condition, None);
        assert_eq!(record.monthly_rent, None);
    }
}
