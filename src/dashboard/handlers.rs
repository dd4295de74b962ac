use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use super::templates::{self, PageView};
use super::{AppState, ChartSet, DashboardError, FeatureInput, MapView, Prediction};

/// Dashboard page. Always renders; missing resources or invalid input show up
/// as error panels.
pub async fn index(
    State(state): State<AppState>,
    query: Result<Query<FeatureInput>, QueryRejection>,
) -> Html<String> {
    let neighborhoods = state.neighborhoods();
    let mut errors: Vec<String> = state.load_errors().to_vec();

    let input = match query {
        Ok(Query(input)) => input,
        Err(rejection) => {
            errors.push(rejection.body_text());
            FeatureInput::default()
        }
    };

    let (row, prediction) = match state.feature_row(input) {
        Ok(row) => {
            let prediction = if state.has_model() && state.data().is_some() {
                match state.predict(row.clone()) {
                    Ok(prediction) => Some(prediction),
                    Err(e) => {
                        errors.push(e.to_string());
                        None
                    }
                }
            } else {
                None
            };
            (Some(row), prediction)
        }
        Err(e) => {
            errors.push(e.to_string());
            (None, None)
        }
    };

    let charts = state.charts(prediction.as_ref()).ok();
    let map = state.map(row.as_ref().map(|r| r.neighborhood.as_str()));

    debug!("Rendering dashboard, prediction: {:?}", prediction.as_ref().map(|p| p.comparison.predicted_rent));

    Html(templates::dashboard_page(&PageView {
        neighborhoods: &neighborhoods,
        row: row.as_ref(),
        prediction: prediction.as_ref(),
        charts: charts.as_ref(),
        map: &map,
        errors: &errors,
    }))
}

pub async fn api_predict(
    State(state): State<AppState>,
    Query(input): Query<FeatureInput>,
) -> Result<Json<Prediction>, DashboardError> {
    let row = state.feature_row(input)?;
    Ok(Json(state.predict(row)?))
}

/// Chart series, with the prediction marker when the model is available
pub async fn api_charts(
    State(state): State<AppState>,
    Query(input): Query<FeatureInput>,
) -> Result<Json<ChartSet>, DashboardError> {
    if state.data().is_none() {
        return Err(DashboardError::Unavailable("reference data not loaded".to_string()));
    }
    let row = state.feature_row(input)?;
    let prediction = if state.has_model() {
        Some(state.predict(row)?)
    } else {
        None
    };
    Ok(Json(state.charts(prediction.as_ref())?))
}

#[derive(Debug, Deserialize)]
pub struct MapQuery {
    pub neighborhood: Option<String>,
}

pub async fn api_map(State(state): State<AppState>, Query(query): Query<MapQuery>) -> Json<MapView> {
    Json(state.map(query.neighborhood.as_deref()))
}

pub async fn api_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "model_loaded": state.has_model(),
        "data_loaded": state.data().is_some(),
        "reference_rows": state.data().map(|d| d.rows().len()).unwrap_or(0),
        "errors": state.load_errors(),
    }))
}
