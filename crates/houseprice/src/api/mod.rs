//! HTTP API for price predictions and saved settings.
//!
//! All routes live under [`BASE_PATH`]:
//!
//! | Method | Path        | Handler                     |
//! |--------|-------------|-----------------------------|
//! | POST   | `/predict`  | [`handlers::predict`]       |
//! | POST   | `/settings` | [`handlers::save_settings`] |
//! | GET    | `/settings` | [`handlers::get_settings`]  |

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use ml_model::PricePredictor;
use sqlx::SqlitePool;

mod error;
pub mod handlers;
mod request;

pub use error::{ApiError, ErrorBody};
pub use handlers::format_price;
pub use request::FeatureRequest;

/// Prefix shared by every route.
pub const BASE_PATH: &str = "/api/houseprice";

/// Shared state handed to every handler.
///
/// The model is fitted before the state is built and never changes afterwards.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn PricePredictor>,
    pub pool: SqlitePool,
}

impl AppState {
    #[must_use]
    pub fn new(model: Arc<dyn PricePredictor>, pool: SqlitePool) -> Self {
        Self { model, pool }
    }
}

/// Builds the router with all routes nested under [`BASE_PATH`].
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/predict", post(handlers::predict))
        .route(
            "/settings",
            get(handlers::get_settings).post(handlers::save_settings),
        );

    Router::new().nest(BASE_PATH, routes).with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use database::{create_pool, run_migrations};
    use ml_model::{FeatureVector, ForestConfig, HousingDataset, PredictionError, TrainingConfig};
    use proptest::prelude::*;
    use proptest::test_runner::TestRunner;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt as _;

    use super::*;

    /// Predictor that prices every house the same.
    struct FixedPrice(f64);

    impl PricePredictor for FixedPrice {
        fn predict_price(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
            if features.is_finite() {
                Ok(self.0)
            } else {
                Err(PredictionError::NonFiniteInput(*features))
            }
        }
    }

    async fn app_with(model: Arc<dyn PricePredictor>) -> (TempDir, Router) {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}", dir.path().join("savedsettings.db").display());
        let pool = create_pool(&url).await.expect("pool");
        run_migrations(&pool).await.expect("migrations");

        (dir, router(AppState::new(model, pool)))
    }

    async fn app() -> (TempDir, Router) {
        app_with(Arc::new(FixedPrice(123_456.789))).await
    }

    async fn send(app: &Router, method: Method, path: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method(method)
            .uri(format!("{BASE_PATH}{path}"));

        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_owned())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).expect("request"))
            .await
            .expect("response");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = serde_json::from_slice(&bytes).expect("JSON body");

        (status, value)
    }

    #[tokio::test]
    async fn test_predict_formats_two_decimals() {
        let (_dir, app) = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/predict",
            Some(r#"{"bedrooms":3,"bathrooms":2,"acre_lot":0.25}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"predicted_price": "123456.79"}));
    }

    #[tokio::test]
    async fn test_predict_defaults_missing_fields() {
        let (_dir, app) = app().await;

        let (status, body) = send(&app, Method::POST, "/predict", Some("{}")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.get("predicted_price").is_some());
    }

    #[tokio::test]
    async fn test_predict_rejects_non_numeric() {
        let (_dir, app) = app().await;

        let (status, body) =
            send(&app, Method::POST, "/predict", Some(r#"{"bedrooms":"abc"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|msg| msg.contains("abc")));
    }

    #[tokio::test]
    async fn test_predict_rejects_malformed_body() {
        let (_dir, app) = app().await;

        let (status, body) = send(&app, Method::POST, "/predict", Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = send(&app, Method::POST, "/predict", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predict_rejects_non_finite() {
        let (_dir, app) = app().await;

        let (status, body) =
            send(&app, Method::POST, "/predict", Some(r#"{"acre_lot":"nan"}"#)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].is_string());
    }

    fn trained_model() -> ml_model::PriceModel {
        let mut csv = String::from("price,bed,bath,acre_lot\n");
        for i in 0..30 {
            csv.push_str(&format!("{},{},{},0.{}\n", 100_000 + i * 7_919, i % 4 + 1, i % 3 + 1, i % 9));
        }
        let dataset = HousingDataset::from_reader(csv.as_bytes()).expect("dataset");
        let config = TrainingConfig {
            forest: ForestConfig::default().with_n_trees(5),
            ..TrainingConfig::default()
        };
        ml_model::train(&dataset, &config).expect("train")
    }

    /// Any finite `f64`, including subnormals and huge magnitudes.
    fn finite() -> prop::num::f64::Any {
        use prop::num::f64::{NEGATIVE, NORMAL, POSITIVE, SUBNORMAL, ZERO};
        POSITIVE | NEGATIVE | NORMAL | SUBNORMAL | ZERO
    }

    #[test]
    fn test_predict_with_trained_model_has_two_decimals() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        let (_dir, app) = runtime.block_on(app_with(Arc::new(trained_model())));

        let mut runner = TestRunner::new(ProptestConfig::with_cases(64));
        runner
            .run(&(finite(), finite(), finite()), |(bedrooms, bathrooms, acre_lot)| {
                let body = json!({
                    "bedrooms": bedrooms,
                    "bathrooms": bathrooms,
                    "acre_lot": acre_lot,
                })
                .to_string();

                let (status, response) =
                    runtime.block_on(send(&app, Method::POST, "/predict", Some(&body)));
                prop_assert_eq!(status, StatusCode::OK);

                let price = response["predicted_price"].as_str().unwrap_or_default();
                let decimals = price.split_once('.').map(|(_, decimals)| decimals);
                prop_assert_eq!(decimals.map(str::len), Some(2), "{} should have two decimals", price);
                prop_assert!(price.parse::<f64>().is_ok_and(f64::is_finite));
                Ok(())
            })
            .expect("every finite input yields a two-decimal price");
    }

    #[tokio::test]
    async fn test_get_settings_before_save_is_empty() {
        let (_dir, app) = app().await;

        let (status, body) = send(&app, Method::GET, "/settings", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn test_settings_round_trip_and_overwrite() {
        let (_dir, app) = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/settings",
            Some(r#"{"bedrooms":3,"bathrooms":2,"acre_lot":0.25}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Settings saved successfully"}));

        let (status, body) = send(&app, Method::GET, "/settings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"bedrooms": 3.0, "bathrooms": 2.0, "acre_lot": 0.25}));

        let (status, _) =
            send(&app, Method::POST, "/settings", Some(r#"{"bedrooms":"5"}"#)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, Method::GET, "/settings", None).await;
        assert_eq!(body, json!({"bedrooms": 5.0, "bathrooms": 0.0, "acre_lot": 0.0}));
    }

    #[tokio::test]
    async fn test_save_settings_rejects_bad_input() {
        let (_dir, app) = app().await;

        let (status, body) =
            send(&app, Method::POST, "/settings", Some(r#"{"bedrooms":"abc"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) =
            send(&app, Method::POST, "/settings", Some(r#"{"bedrooms":"inf"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Nothing was stored by the failed requests.
        let (_, body) = send(&app, Method::GET, "/settings", None).await;
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn test_storage_failure_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}", dir.path().join("savedsettings.db").display());
        let pool = create_pool(&url).await.expect("pool");
        run_migrations(&pool).await.expect("migrations");
        pool.close().await;

        let app = router(AppState::new(Arc::new(FixedPrice(1.0)), pool));
        let (status, body) = send(&app, Method::GET, "/settings", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }
}
