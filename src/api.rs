//! HTTP translation proxy.
//!
//! This module owns request parsing, rate limiting, input validation and
//! response formatting while delegating translation to a provider.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::language::LanguageTag;
use crate::provider::{ProviderRequest, TranslationProvider};
use crate::rate_limit::FixedWindowLimiter;

/// Human-readable service name returned by health endpoints.
pub const APP_NAME: &str = "echoverse-translate";
/// Service version string returned by health endpoints.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared state injected into all route handlers.
pub struct AppState {
    /// Runtime configuration loaded at startup.
    pub cfg: AppConfig,
    /// Remote translation backend.
    pub provider: Arc<dyn TranslationProvider>,
    /// Per-caller limiter for `/api/translate`.
    pub limiter: FixedWindowLimiter,
}

impl AppState {
    pub fn new(cfg: AppConfig, provider: Arc<dyn TranslationProvider>) -> Self {
        let limiter = FixedWindowLimiter::new(cfg.rate_limit_per_minute);
        Self {
            cfg,
            provider,
            limiter,
        }
    }
}

/// Builds the Axum router for all public endpoints.
pub fn build_router(state: Arc<AppState>) -> Router {
    let translate_routes = Router::new()
        .route("/api/translate", post(translate))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .route("/", get(root))
        .route("/health", get(root))
        .route("/api/languages", get(list_languages))
        .merge(translate_routes)
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

/// Status endpoint (`GET /`, `GET /health`).
pub async fn root(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "name": APP_NAME,
        "version": APP_VERSION,
        "model": state.cfg.gemini_model,
        "provider_configured": state.cfg.provider_configured(),
    }))
}

/// Lists supported target languages (`GET /api/languages`).
pub async fn list_languages() -> Json<serde_json::Value> {
    let data = LanguageTag::all()
        .iter()
        .map(|lang| json!({"code": lang.code(), "name": lang.name()}))
        .collect::<Vec<_>>();
    Json(json!({ "data": data }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatePayload {
    text: Option<String>,
    target_lang: Option<String>,
}

/// Translates text through the provider (`POST /api/translate`).
async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslatePayload>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(payload) =
        payload.map_err(|err| AppError::invalid_request(format!("invalid JSON body: {err}")))?;
    let request = validate_translate_payload(&state.cfg, payload)?;
    let target = request.target_language_name.clone();

    let text = state.provider.translate(request).await.map_err(|err| {
        error!(error = %err, language = %target, "translation error");
        AppError::provider(err.message)
    })?;

    info!(language = %target, "translation served");
    Ok(Json(json!({ "translatedText": text })))
}

fn validate_translate_payload(
    cfg: &AppConfig,
    payload: TranslatePayload,
) -> Result<ProviderRequest, AppError> {
    let text = payload.text.filter(|t| !t.trim().is_empty());
    let target = payload
        .target_lang
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let (Some(text), Some(target)) = (text, target) else {
        return Err(AppError::invalid_request(
            "Please provide text and target language",
        ));
    };

    if text.chars().count() > cfg.max_text_chars {
        return Err(AppError::invalid_request(format!(
            "Text too long. Please limit to {} characters.",
            cfg.max_text_chars
        )));
    }

    // Clients may send either a language name or one of our codes.
    let target_language_name = match LanguageTag::parse(&target) {
        Ok(lang) => lang.name().to_string(),
        Err(_) => target,
    };

    Ok(ProviderRequest {
        phrase: text,
        target_language_name,
    })
}

async fn rate_limit(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let caller = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if !state.limiter.check(&caller) {
        warn!(%caller, limit = state.limiter.limit(), "rate limit exceeded");
        return Err(AppError::rate_limited(
            "Too many requests. Please try again later.",
        ));
    }
    Ok(next.run(req).await)
}

/// Allows the browser UI to call the proxy from another origin.
async fn cors(req: Request, next: Next) -> Response {
    let mut res = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let headers = res.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    res
}
