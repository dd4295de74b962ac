//! Router configuration for the dashboard.

use axum::{routing::get, Router};

use super::handlers;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/predict", get(handlers::api_predict))
        .route("/api/charts", get(handlers::api_charts))
        .route("/api/map", get(handlers::api_map))
        .route("/api/health", get(handlers::api_health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{Dashboard, LinearRentModel, ReferenceData, RentModel};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    const DATA: &str = "quartier,superficie,nombre_chambres,douche_wc,type_d_acces,meublé,etat_general,loyer_mensuel
Isoraka,80,3,interieur,voiture,oui,bon,500000
Isoraka,60,2,exterieur,moto,non,moyen,300000
Analakely,40,1,exterieur,sans,non,mauvais,100000
";

    fn model() -> Box<dyn RentModel> {
        Box::new(LinearRentModel {
            intercept: 100_000.0,
            ..Default::default()
        })
    }

    fn app(with_model: bool, with_data: bool) -> Router {
        let data = with_data.then(|| ReferenceData::from_reader(DATA.as_bytes()).unwrap());
        let model = with_model.then(model);
        create_router(Arc::new(Dashboard::new(model, data)))
    }

    async fn fetch(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_predict_endpoint() {
        let (status, body) = fetch(
            app(true, true),
            "/api/predict?neighborhood=Isoraka&area_sqm=70&room_count=2&condition=bon",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["comparison"]["predicted_rent"], 100_000.0);
        assert_eq!(json["comparison"]["neighborhood_mean"], 400_000.0);
        assert_eq!(json["comparison"]["global_mean"], 300_000.0);
        assert_eq!(json["features"]["area_per_room"], 35.0);
        assert_eq!(json["features"]["condition"], "bon");
    }

    #[tokio::test]
    async fn test_predict_rejects_out_of_range() {
        let (status, body) = fetch(app(true, true), "/api/predict?area_sqm=500").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("area_sqm"));
    }

    #[tokio::test]
    async fn test_predict_without_model_is_unavailable() {
        let (status, _) = fetch(app(false, true), "/api/predict").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_charts_without_model_have_no_marker() {
        let (status, body) = fetch(app(false, true), "/api/charts").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["rent_distribution"]["marker"].is_null());
        assert_eq!(json["mean_by_neighborhood"][0]["neighborhood"], "Isoraka");
    }

    #[tokio::test]
    async fn test_charts_without_data_are_unavailable() {
        let (status, _) = fetch(app(true, false), "/api/charts").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_map_endpoint() {
        let (status, body) = fetch(app(true, true), "/api/map?neighborhood=Analakely").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let markers = json["markers"].as_array().unwrap();
        let selected: Vec<_> = markers.iter().filter(|m| m["selected"] == true).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0]["name"], "Analakely");
        assert_eq!(selected[0]["mean_rent"], 100_000.0);
    }

    #[tokio::test]
    async fn test_index_renders_prediction() {
        let (status, body) = fetch(app(true, true), "/?neighborhood=Isoraka").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Loyer mensuel estimé"));
        assert!(body.contains("100 000 Ar"));
        assert!(body.contains("<option value=\"Isoraka\" selected>"));
    }

    #[tokio::test]
    async fn test_index_degrades_without_resources() {
        let (status, body) = fetch(app(false, false), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("class=\"error\""));
        assert!(!body.contains("Loyer mensuel estimé"));
    }

    #[tokio::test]
    async fn test_index_treats_blank_numbers_as_defaults() {
        let (status, body) = fetch(app(true, true), "/?neighborhood=Isoraka&area_sqm=&room_count=2").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Loyer mensuel estimé"));
        assert!(!body.contains("class=\"error\""));
    }

    #[tokio::test]
    async fn test_index_shows_malformed_query_as_error() {
        let (status, body) = fetch(app(true, true), "/?area_sqm=abc&condition=excellent").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("class=\"error\""));
        assert!(body.contains("Loyer mensuel estimé"));
    }

    #[tokio::test]
    async fn test_predict_accepts_blank_area() {
        let (status, body) = fetch(app(true, true), "/api/predict?neighborhood=Isoraka&area_sqm=").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["features"]["area_sqm"], 80);
    }

    #[tokio::test]
    async fn test_health_reports_load_state() {
        let (status, body) = fetch(app(false, true), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["model_loaded"], false);
        assert_eq!(json["data_loaded"], true);
    }
}
