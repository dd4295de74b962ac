use crate::dashboard::stats::mean;
use crate::dashboard::ReferenceData;
use serde::Serialize;

/// Approximate coordinates of Antananarivo neighborhoods (latitude, longitude)
pub const NEIGHBORHOOD_COORDS: &[(&str, f64, f64)] = &[
    ("Anosibe", -18.9141, 47.5315),
    ("Analamahitsy", -18.8689, 47.5315),
    ("Andoharanofotsy", -18.9667, 47.5167),
    ("67Ha", -18.9000, 47.5167),
    ("Analakely", -18.9100, 47.5233),
    ("Ambatobe", -18.8833, 47.5333),
    ("Ambanidia", -18.9167, 47.5333),
    ("Ambatonakanga", -18.9167, 47.5250),
    ("Ambatoroka", -18.9000, 47.5333),
    ("Ambodivona", -18.9167, 47.5167),
    ("Ambolokandrina", -18.9333, 47.5167),
    ("Ampandrana", -18.9000, 47.5083),
    ("Andraharo", -18.8833, 47.5083),
    ("Ankazobe", -18.9333, 47.5083),
    ("Ankadifotsy", -18.9000, 47.5250),
    ("Ivandry", -18.8833, 47.5417),
    ("Isoraka", -18.9167, 47.5167),
    ("Soanierana", -18.9333, 47.5417),
    ("Tanjombato", -18.9833, 47.5167),
    ("Tsaralalana", -18.9000, 47.5167),
];

pub const MAP_CENTER: (f64, f64) = (-18.9100, 47.5233);
pub const MAP_ZOOM: u8 = 12;

#[derive(Debug, Clone, Serialize)]
pub struct MapMarker {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub mean_rent: Option<f64>,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

/// Name of the mapped neighborhood that `text` refers to, if any.
///
/// Listing locations are free text such as "Isoraka, Antananarivo", so the
/// match is a case-insensitive substring test.
pub fn canonical_neighborhood(text: &str) -> Option<&'static str> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    NEIGHBORHOOD_COORDS
        .iter()
        .map(|(name, _, _)| *name)
        .find(|name| lowered.contains(&name.to_lowercase()))
}

/// One marker per mapped neighborhood, with the mean reference rent of rows
/// located there; the marker of `selected` is flagged
pub fn map_view(data: Option<&ReferenceData>, selected: Option<&str>) -> MapView {
    let selected = selected.and_then(canonical_neighborhood);

    let markers = NEIGHBORHOOD_COORDS
        .iter()
        .map(|&(name, latitude, longitude)| {
            let mean_rent = data.and_then(|data| {
                mean(
                    data.priced()
                        .filter(|(row, _)| canonical_neighborhood(&row.neighborhood) == Some(name))
                        .map(|(_, rent)| rent as f64),
                )
            });
            MapMarker {
                name,
                latitude,
                longitude,
                mean_rent,
                selected: selected == Some(name),
            }
        })
        .collect();

    MapView {
        center: MAP_CENTER,
        zoom: MAP_ZOOM,
        markers,
    }
}
