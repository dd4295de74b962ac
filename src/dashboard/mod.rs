//! Rent prediction dashboard.
//!
//! Serves an HTML form and JSON endpoints that:
//! - predict the monthly rent of a dwelling with a pre-trained model
//! - compare the prediction with neighborhood and global mean rents
//! - expose chart series and map markers computed from a reference dataset
//!
//! The model and the dataset are loaded once at startup. A resource that fails
//! to load is reported on every page and the panels that need it are skipped.

mod data;
mod form;
mod handlers;
mod map;
mod model;
mod routes;
mod stats;
mod templates;

pub use data::ReferenceData;
pub use form::FeatureInput;
pub use map::{map_view, MapView};
pub use model::{LinearRentModel, RentModel};
pub use routes::create_router;
pub use stats::{ChartSet, Comparison};

use crate::config::DashboardSettings;
use crate::models::FeatureRow;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Could not load the model from {path}: {message}")]
    ModelLoad { path: PathBuf, message: String },

    #[error("Could not load the reference data from {path}: {message}")]
    DataLoad { path: PathBuf, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DashboardError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            DashboardError::ModelLoad { .. } | DashboardError::DataLoad { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Prediction for one feature row
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub features: FeatureRow,
    pub comparison: Comparison,
}

/// Resources loaded once for the life of the server
pub struct Dashboard {
    model: Option<Box<dyn RentModel>>,
    data: Option<ReferenceData>,
    load_errors: Vec<String>,
}

impl Dashboard {
    #[cfg(test)]
    pub fn new(model: Option<Box<dyn RentModel>>, data: Option<ReferenceData>) -> Self {
        Self {
            model,
            data,
            load_errors: Vec::new(),
        }
    }

    /// Load the model and the reference data. Failures are kept as messages
    /// for the user instead of aborting.
    pub fn load(settings: &DashboardSettings) -> Self {
        let mut load_errors = Vec::new();

        let model = match LinearRentModel::load(&settings.model_path) {
            Ok(model) => Some(Box::new(model) as Box<dyn RentModel>),
            Err(e) => {
                warn!("{}", e);
                load_errors.push(e.to_string());
                None
            }
        };

        let data = match ReferenceData::load(&settings.data_path) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("{}", e);
                load_errors.push(e.to_string());
                None
            }
        };

        Self {
            model,
            data,
            load_errors,
        }
    }

    pub fn load_errors(&self) -> &[String] {
        &self.load_errors
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn data(&self) -> Option<&ReferenceData> {
        self.data.as_ref()
    }

    /// Neighborhood choices of the form
    pub fn neighborhoods(&self) -> Vec<String> {
        self.data
            .as_ref()
            .map(ReferenceData::neighborhoods)
            .unwrap_or_default()
    }

    pub fn feature_row(&self, input: FeatureInput) -> Result<FeatureRow, DashboardError> {
        input.into_feature_row(&self.neighborhoods())
    }

    /// Predict the rent and compare it with the reference data.
    /// Needs both the model and the data.
    pub fn predict(&self, row: FeatureRow) -> Result<Prediction, DashboardError> {
        let (Some(model), Some(data)) = (&self.model, &self.data) else {
            return Err(DashboardError::Unavailable(
                "prediction needs both the model and the reference data".to_string(),
            ));
        };

        let predicted = model.predict(&row);
        let comparison = stats::compare(data, &row.neighborhood, predicted);
        Ok(Prediction {
            features: row,
            comparison,
        })
    }

    /// Chart series; the prediction marker is set when `prediction` is given
    pub fn charts(&self, prediction: Option<&Prediction>) -> Result<ChartSet, DashboardError> {
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| DashboardError::Unavailable("reference data not loaded".to_string()))?;
        Ok(stats::chart_set(
            data,
            prediction.map(|p| (&p.features, p.comparison.predicted_rent)),
        ))
    }

    pub fn map(&self, selected: Option<&str>) -> MapView {
        map_view(self.data.as_ref(), selected)
    }
}

/// Shared state of the HTTP handlers
pub type AppState = Arc<Dashboard>;

/// Start the dashboard server
pub async fn serve(settings: &DashboardSettings) -> anyhow::Result<()> {
    let dashboard = Dashboard::load(settings);
    let app = create_router(Arc::new(dashboard));

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    info!("🏠 Dashboard running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
