use crate::server::auth::{BearerAuthorizer, TokenStore};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use snowgate::{Error, JsonBool, SnowflakeDiscordId, format_bool, gate};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    tokens: Arc<TokenStore>,
}

impl AppState {
    pub fn new(tokens: TokenStore) -> Self {
        Self {
            tokens: Arc::new(tokens),
        }
    }

    fn authorizer(&self, headers: &HeaderMap) -> BearerAuthorizer {
        BearerAuthorizer::from_headers(self.tokens.clone(), headers)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/snowflakes/{id}", get(decode_snowflake))
        .route("/bool/{value}", get(normalize_bool))
        .route("/me", get(me).delete(logout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct SnowflakeInfo {
    id: SnowflakeDiscordId,
    created_at: DateTime<Utc>,
    timestamp_ms: i64,
    worker_id: u64,
    process_id: u64,
    increment: u64,
}

impl From<SnowflakeDiscordId> for SnowflakeInfo {
    fn from(id: SnowflakeDiscordId) -> Self {
        let created_at = id.created_at();
        Self {
            id,
            created_at,
            timestamp_ms: created_at.timestamp_millis(),
            worker_id: id.worker_id(),
            process_id: id.process_id(),
            increment: id.increment(),
        }
    }
}

async fn decode_snowflake(Path(raw): Path<String>) -> Result<Json<SnowflakeInfo>, Error> {
    let id: SnowflakeDiscordId = raw.parse()?;
    Ok(Json(id.into()))
}

#[derive(Debug, Serialize)]
struct BoolResponse {
    value: &'static str,
}

async fn normalize_bool(Path(raw): Path<String>) -> Result<Json<BoolResponse>, Error> {
    let value = format_bool(&raw)?;
    Ok(Json(BoolResponse { value }))
}

#[derive(Debug, Serialize)]
struct MeResponse {
    user_id: SnowflakeDiscordId,
    account_created_at: DateTime<Utc>,
    authorized: JsonBool,
}

async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<MeResponse>, Error> {
    let authorizer = state.authorizer(&headers);
    let token = authorizer.token().map(str::to_owned);
    gate(authorizer, current_user)
        .call((state, token))
        .await
        .map(Json)
}

async fn current_user((state, token): (AppState, Option<String>)) -> Result<MeResponse, Error> {
    // The token can be revoked between the gate check and this lookup.
    let user_id = match token {
        Some(token) => state.tokens.user_for(&token).await,
        None => None,
    }
    .ok_or(Error::Unauthorized)?;

    Ok(MeResponse {
        user_id,
        account_created_at: user_id.created_at(),
        authorized: JsonBool::new(true),
    })
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode, Error> {
    let authorizer = state.authorizer(&headers);
    let token = authorizer.token().map(str::to_owned);
    gate(authorizer, revoke_token).call((state, token)).await
}

async fn revoke_token((state, token): (AppState, Option<String>)) -> Result<StatusCode, Error> {
    if let Some(token) = token {
        if state.tokens.revoke(&token).await {
            tracing::info!("bearer token revoked");
        }
    }
    Ok(StatusCode::NO_CONTENT)
}
