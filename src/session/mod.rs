use anyhow::Result;
use chrono::NaiveDate;
use log::{info, warn};
use std::str::FromStr;

use crate::api::BookingApi;
use crate::config::{CATEGORY, PROBE_LOCATION_ID};
use crate::domain::{FacilityQuery, QueryResult, Session};
use crate::errors::AuthError;

/// How a probe that failed in transport is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbePolicy {
    /// A transport error says nothing about the token: keep it
    #[default]
    Lenient,
    /// Only a successful probe keeps the token
    Strict,
}

impl ProbePolicy {
    pub fn accepts(&self, probe: &QueryResult) -> bool {
        match probe {
            QueryResult::Success { .. } => true,
            QueryResult::Unauthorized => false,
            QueryResult::TransportError(_) => *self == Self::Lenient,
        }
    }
}

impl FromStr for ProbePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => anyhow::bail!("Unknown token probe policy '{}' (expected lenient or strict)", other),
        }
    }
}

/// Where a freshly issued token is written so later runs can reuse it
pub trait TokenStore {
    fn persist_token(&self, token: &str) -> Result<()>;
}

/// Validates a cached bearer token or replaces it with a fresh login
pub struct SessionManager {
    policy: ProbePolicy,
}

impl SessionManager {
    pub fn new(policy: ProbePolicy) -> Self {
        Self { policy }
    }

    pub async fn ensure_authenticated<A, T>(
        &self,
        api: &mut A,
        tokens: &T,
        session: Session,
        today: NaiveDate,
    ) -> Result<Session, AuthError>
    where
        A: BookingApi,
        T: TokenStore,
    {
        if self.token_still_valid(api, &session, today).await {
            info!("  → Cached token accepted");
            return Ok(session);
        }

        info!("  → Attempting fresh login...");
        let token = api.login(&session).await?;

        // The one place the token leaves the process.
        if let Err(e) = tokens.persist_token(&token) {
            warn!("Failed to persist new token: {:?}", e);
        }

        info!("  → New login successful");
        Ok(session.with_token(token))
    }

    async fn token_still_valid<A: BookingApi>(
        &self,
        api: &mut A,
        session: &Session,
        today: NaiveDate,
    ) -> bool {
        if session.token.is_none() {
            info!("  → No cached token");
            return false;
        }

        let probe = FacilityQuery::new(CATEGORY, PROBE_LOCATION_ID, today);
        let result = api.search_facilities(session, &probe).await;
        if let QueryResult::TransportError(message) = &result {
            warn!("Token probe failed in transport ({:?} policy): {}", self.policy, message);
        }
        self.policy.accepts(&result)
    }
}
