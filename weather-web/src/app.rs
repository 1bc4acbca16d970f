use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    response::Html,
    routing::get,
};
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use weather_core::WeatherService;

use crate::page;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WeatherService>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub city: Option<String>,
}

pub fn build_router(service: WeatherService) -> Router {
    let state = AppState { service: Arc::new(service) };

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn index_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Html<String> {
    // An unparseable query string (e.g. a repeated `city`) gets the empty page, not a 400.
    let city = match params {
        Ok(Query(params)) => params.city.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!(%rejection, "ignoring unparseable search query");
            String::new()
        }
    };
    let outcome = state.service.lookup(&city).await;
    Html(page::render(city.trim(), &outcome, &Local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use tower::ServiceExt;
    use weather_core::{
        LookupError, Temperatures, WeatherProvider, WeatherQuery, WeatherReport,
    };

    #[derive(Debug)]
    struct StubProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn current(&self, query: &WeatherQuery) -> Result<WeatherReport, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match query.city() {
                "London" => Ok(london()),
                "Slowville" => Err(LookupError::Timeout),
                "Garbled" => Err(LookupError::MalformedResponse("missing field `main`".into())),
                _ => Err(LookupError::NotFound),
            }
        }
    }

    fn london() -> WeatherReport {
        WeatherReport {
            location_name: "London".into(),
            country_code: "GB".into(),
            observation_time: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            temperature: Temperatures {
                current_c: 12.3,
                feels_like_c: 11.6,
                min_c: 10.9,
                max_c: 13.4,
            },
            humidity_pct: 81,
            pressure_hpa: 1012,
            wind_speed_mps: 4.6,
            description: "light rain".into(),
            icon: "10d".into(),
            visibility_m: Some(10_000),
            cloudiness_pct: None,
            rain_1h_mm: None,
            snow_1h_mm: None,
            sunrise: None,
            sunset: None,
        }
    }

    fn app() -> (Router, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = StubProvider { calls: Arc::clone(&calls) };
        (build_router(WeatherService::new(Box::new(provider))), calls)
    }

    async fn get_page(app: Router, uri: &str) -> (StatusCode, String) {
        let res = app.oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn landing_page_prompts_without_lookup() {
        let (app, calls) = app();
        let (status, body) = get_page(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Enter a city name to get started!"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_city_prompts_without_lookup() {
        let (app, calls) = app();
        let (_, body) = get_page(app, "/?city=+++").await;

        assert!(body.contains("Enter a city name to get started!"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn known_city_renders_report() {
        let (app, calls) = app();
        let (status, body) = get_page(app, "/?city=London").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h2>London, GB</h2>"));
        assert!(body.contains("12.3°C"));
        assert!(body.contains("Light rain"));
        assert!(body.contains("10.0 km"));
        assert!(body.contains("https://openweathermap.org/img/wn/10d@2x.png"));
        assert!(!body.contains("Cloudiness"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_city_says_not_found() {
        let (app, _) = app();
        let (status, body) = get_page(app, "/?city=Xyzzyplorp123").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("City not found"));
        assert!(body.contains("value=\"Xyzzyplorp123\""));
    }

    #[tokio::test]
    async fn timeout_asks_to_try_again() {
        let (app, _) = app();
        let (_, body) = get_page(app, "/?city=Slowville").await;
        assert!(body.contains("Please try again"));
    }

    #[tokio::test]
    async fn malformed_response_renders_no_fields() {
        let (app, _) = app();
        let (_, body) = get_page(app, "/?city=Garbled").await;

        assert!(body.contains("Something went wrong"));
        assert!(!body.contains("Temperature"));
        assert!(!body.contains("missing field"));
    }

    #[tokio::test]
    async fn repeated_city_parameter_falls_back_to_prompt() {
        let (app, calls) = app();
        let (status, body) = get_page(app, "/?city=a&city=b").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Enter a city name to get started!"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (app, _) = app();
        let (status, body) = get_page(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
