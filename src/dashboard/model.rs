//! Rent prediction models.

use crate::dashboard::DashboardError;
use crate::models::FeatureRow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Anything that predicts a monthly rent from a feature row
pub trait RentModel: Send + Sync {
    fn predict(&self, row: &FeatureRow) -> f64;
}

/// Weights of the numeric features
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NumericWeights {
    #[serde(default)]
    pub superficie: f64,
    #[serde(default)]
    pub nombre_chambres: f64,
    #[serde(default)]
    pub superficie_par_chambre: f64,
}

/// Linear regression over one-hot encoded categorical features.
///
/// Serialized as JSON:
///
/// ```json
/// {
///   "intercept": 120000.0,
///   "numeric": { "superficie": 2500.0, "nombre_chambres": 15000.0, "superficie_par_chambre": 300.0 },
///   "categorical": {
///     "quartier": { "Isoraka": 90000.0 },
///     "type_d_acces": { "voiture_avec_par_parking": 60000.0 }
///   }
/// }
/// ```
///
/// A category value missing from the table contributes nothing, which makes it
/// the reference level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearRentModel {
    pub intercept: f64,
    #[serde(default)]
    pub numeric: NumericWeights,
    /// Feature name → category value → weight
    #[serde(default)]
    pub categorical: HashMap<String, HashMap<String, f64>>,
}

impl LinearRentModel {
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let content = std::fs::read_to_string(path).map_err(|e| DashboardError::ModelLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let model: Self = serde_json::from_str(&content).map_err(|e| DashboardError::ModelLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!(
            "Loaded rent model from {} ({} categorical features)",
            path.display(),
            model.categorical.len()
        );
        Ok(model)
    }

    fn category_weight(&self, feature: &str, value: &str) -> f64 {
        self.categorical
            .get(feature)
            .and_then(|weights| weights.get(value))
            .copied()
            .unwrap_or(0.0)
    }
}

impl RentModel for LinearRentModel {
    fn predict(&self, row: &FeatureRow) -> f64 {
        let numeric = self.numeric.superficie * row.area_sqm as f64
            + self.numeric.nombre_chambres * row.room_count as f64
            + self.numeric.superficie_par_chambre * row.area_per_room;

        let categorical = [
            ("quartier", row.neighborhood.as_str()),
            ("douche_wc", row.bathroom_location.as_wire()),
            ("type_d_acces", row.access_type.as_wire()),
            ("meublé", row.furnished.as_wire()),
            ("etat_general", row.condition.as_wire()),
        ]
        .iter()
        .map(|(feature, value)| self.category_weight(feature, value))
        .sum::<f64>();

        self.intercept + numeric + categorical
    }
}
