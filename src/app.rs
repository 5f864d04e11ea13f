use std::net::SocketAddr;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;
use crate::{
    ai, auth, barcode, daily_logs, exercises, food_entries, images, nutrition, profile,
    supplements, weight_logs,
};

fn cors(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn build_app(state: AppState) -> Router {
    let cors = cors(&state.config.allowed_origins);
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth::router())
                .merge(profile::router())
                .merge(daily_logs::router())
                .merge(food_entries::router())
                .merge(supplements::router())
                .merge(exercises::router())
                .merge(nutrition::router())
                .merge(weight_logs::router())
                .merge(barcode::router())
                .merge(ai::router())
                .merge(images::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtKeys;
    use std::sync::Arc;
    use axum::{
        body::{to_bytes, Body},
        extract::FromRef,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn bearer(state: &AppState) -> String {
        let token = JwtKeys::from_ref(state).sign_access(Uuid::new_v4()).unwrap();
        format!("Bearer {token}")
    }

    fn chat_request(auth: Option<String>, body: Value) -> Request<Body> {
        let mut req = Request::post("/api/v1/chat").header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            req = req.header(header::AUTHORIZATION, auth);
        }
        req.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(res: axum::response::Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(chat_request(None, json!({"message": "two eggs"})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn chat_goes_through_the_advisor() {
        let state = AppState::fake();
        let auth = bearer(&state);
        let res = build_app(state)
            .oneshot(chat_request(
                Some(auth),
                json!({"message": "two eggs", "history": [{"role": "user", "content": "hi"}]}),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["message"], "heard \"two eggs\" after 1 turn(s)");
    }

    #[tokio::test]
    async fn empty_chat_message_is_rejected() {
        let state = AppState::fake();
        let auth = bearer(&state);
        let res = build_app(state)
            .oneshot(chat_request(Some(auth), json!({"message": "   "})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn failed_advisor_maps_to_bad_gateway() {
        let state = AppState::fake_with(crate::ai::fake::FakeAdvisor::failing());
        let auth = bearer(&state);
        let res = build_app(state)
            .oneshot(chat_request(Some(auth), json!({"message": "toast"})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }

    fn authed_get(state: &AppState, uri: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::AUTHORIZATION, bearer(state))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn barcode_lookup_returns_the_product() {
        use crate::barcode::fake::{product, FakeProducts};

        let mut state = AppState::fake();
        state.products = Arc::new(FakeProducts::default().with(product("3017620422003", "Nutella")));
        let res = build_app(state.clone())
            .oneshot(authed_get(&state, "/api/v1/barcode/3017620422003"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["name"], "Nutella");
        assert_eq!(body["serving_size"], "100g");
        assert!(body["micronutrients"]["iron_mg"].is_number());

        let res = build_app(state.clone())
            .oneshot(authed_get(&state, "/api/v1/barcode/12345678"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(res).await["error"], "Product not found");
    }

    #[tokio::test]
    async fn barcode_lookup_rejects_bad_codes_and_maps_failures() {
        let state = AppState::fake();
        let res = build_app(state.clone())
            .oneshot(authed_get(&state, "/api/v1/barcode/abc123"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let mut state = AppState::fake();
        state.products = Arc::new(crate::barcode::fake::FakeProducts::failing());
        let res = build_app(state.clone())
            .oneshot(authed_get(&state, "/api/v1/barcode/12345678"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn weight_log_input_is_checked_before_storage() {
        let state = AppState::fake();
        let res = build_app(state.clone())
            .oneshot(authed_get(&state, "/api/v1/weight-logs?start_date=2025-01-01"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let req = Request::post("/api/v1/weight-logs")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, bearer(&state))
            .body(Body::from(json!({"weight_kg": -3.0}).to_string()))
            .unwrap();
        let res = build_app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn goal_preview_needs_no_database() {
        let state = AppState::fake();
        let auth = bearer(&state);
        let req = Request::post("/api/v1/ai/calculate-goals")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, auth)
            .body(Body::from(
                json!({
                    "age": 30, "weight_kg": 70.0, "height_cm": 175.0, "gender": "male",
                    "activity_level": "moderately_active", "goal": "lose"
                })
                .to_string(),
            ))
            .unwrap();
        let res = build_app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
