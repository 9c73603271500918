use crate::config::settings::ScraperSettings;
use crate::domain::{FacilityQuery, QueryResult, Session, Venue};
use crate::errors::AuthError;
use crate::http::RateLimitedClient;
use anyhow::Result;
use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;

/// The remote calls a scrape run depends on
pub trait BookingApi {
    /// Exchange credentials for a bearer token
    fn login(&mut self, session: &Session) -> impl Future<Output = Result<String, AuthError>> + Send;

    /// Look up facility availability for one location and date
    fn search_facilities(
        &mut self,
        session: &Session,
        query: &FacilityQuery,
    ) -> impl Future<Output = QueryResult> + Send;
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    error: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Deserialize)]
struct FacilityResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<FacilityPage>,
}

#[derive(Deserialize)]
struct FacilityPage {
    #[serde(default)]
    data: Vec<Value>,
}

/// Booking service API client
pub struct BookingClient {
    client: RateLimitedClient,
}

impl BookingClient {
    pub fn new(settings: &ScraperSettings) -> Result<Self> {
        let client = RateLimitedClient::new(
            &settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?;
        Ok(Self { client })
    }

    // --- Helper Methods ---

    fn build_search_params(query: &FacilityQuery) -> [(&'static str, String); 3] {
        [
            ("sub_category", query.category.clone()),
            ("location_id", query.location_id.to_string()),
            ("search_date", query.search_date()),
        ]
    }

    /// Decode each venue on its own so one malformed record doesn't drop the page
    fn decode_venues(raw: Vec<Value>, query: &FacilityQuery) -> Vec<Venue> {
        raw.into_iter()
            .enumerate()
            .filter_map(|(idx, value)| match serde_json::from_value::<Venue>(value) {
                Ok(venue) => Some(venue),
                Err(e) => {
                    warn!(
                        "Skipping venue #{} for location {} on {}: {}",
                        idx,
                        query.location_id,
                        query.search_date(),
                        e
                    );
                    None
                }
            })
            .collect()
    }
}

impl BookingApi for BookingClient {
    async fn login(&mut self, session: &Session) -> Result<String, AuthError> {
        let url = session.endpoint("login");
        let payload = LoginRequest {
            email: &session.credentials.email,
            password: &session.credentials.password,
            error: "",
        };

        let response = self
            .client
            .post_json(&url, &payload)
            .await
            .map_err(|e| AuthError::LoginFailed(format!("{:#}", e)))?;

        let status = response.status();
        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| AuthError::LoginFailed(format!("unreadable login response ({}): {}", status, e)))?;

        match body.token.filter(|t| !t.is_empty()) {
            Some(token) if body.success => {
                info!("Login accepted for {}", session.credentials.email);
                Ok(token)
            }
            _ => Err(AuthError::LoginFailed(format!("service rejected credentials ({})", status))),
        }
    }

    async fn search_facilities(&mut self, session: &Session, query: &FacilityQuery) -> QueryResult {
        let url = session.endpoint("location/facility");
        let params = Self::build_search_params(query);

        let response = match self.client.get(&url, &params, session.token.as_deref()).await {
            Ok(response) => response,
            Err(e) => {
                warn!("API Error for Location {}: {:#}", query.location_id, e);
                return QueryResult::TransportError(format!("{:#}", e));
            }
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return QueryResult::Unauthorized;
        }
        if !status.is_success() {
            warn!("API Error for Location {}: status {}", query.location_id, status);
            return QueryResult::TransportError(format!("API returned status: {}", status));
        }

        let body: FacilityResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Unreadable facility response for Location {}: {}", query.location_id, e);
                return QueryResult::TransportError(format!("Failed to decode facility response: {}", e));
            }
        };

        if !body.success {
            return QueryResult::TransportError("Booking service reported success=false".to_string());
        }

        let raw = body.data.map(|page| page.data).unwrap_or_default();
        debug!("Location {} on {}: {} venues", query.location_id, query.search_date(), raw.len());
        QueryResult::Success {
            venues: Self::decode_venues(raw, query),
        }
    }
}
