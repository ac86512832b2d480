//! Bearer-token authorization for protected routes.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use snowgate::{Authorizer, SnowflakeDiscordId};
use std::{collections::HashMap, future::Future, sync::Arc};
use tokio::sync::RwLock;

/// Accepted bearer tokens and the Discord user each one authenticates.
///
/// Shared by every request; lookups take a read lock so concurrent requests
/// never block each other.
#[derive(Default)]
pub struct TokenStore {
    tokens: RwLock<HashMap<String, SnowflakeDiscordId>>,
}

impl TokenStore {
    pub fn new(tokens: HashMap<String, SnowflakeDiscordId>) -> Self {
        Self {
            tokens: RwLock::new(tokens),
        }
    }

    pub async fn user_for(&self, token: &str) -> Option<SnowflakeDiscordId> {
        self.tokens.read().await.get(token).copied()
    }

    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }
}

/// Request-scoped authorizer: the token presented by one request, checked
/// against the shared store.
#[derive(Clone)]
pub struct BearerAuthorizer {
    store: Arc<TokenStore>,
    presented: Option<String>,
}

impl BearerAuthorizer {
    pub fn from_headers(store: Arc<TokenStore>, headers: &HeaderMap) -> Self {
        Self {
            store,
            presented: bearer_token(headers).map(str::to_owned),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.presented.as_deref()
    }
}

impl Authorizer for BearerAuthorizer {
    fn is_authorized(&self) -> impl Future<Output = bool> {
        async move {
            match self.presented.as_deref() {
                Some(token) => self.store.user_for(token).await.is_some(),
                None => false,
            }
        }
    }
}

/// Extracts `<token>` from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
