//! Загрузка документа зала по HTTP.
//!
//! Пробуются две локации в фиксированном порядке: сначала сгенерированный
//! большой зал, затем базовый. Подходит первый ответ с успешным статусом и
//! JSON в `Content-Type`. Повторов нет: ошибка уходит пользователю,
//! который может перезагрузить вручную.

use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::VenueLoadError;
use crate::models::Venue;

pub const VENUE_CANDIDATES: [&str; 2] = ["venue-generated.json", "venue.json"];

#[derive(Clone)]
pub struct VenueClient {
    /// Базовый URL, к которому добавляются имена документов.
    base_url: String,
    http_client: reqwest::Client,
}

impl VenueClient {
    pub fn new(base_url: &str) -> Result<Self, VenueLoadError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(VenueLoadError::Client)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn load(&self) -> Result<Venue, VenueLoadError> {
        let mut last_error = String::from("no venue document available");

        for name in VENUE_CANDIDATES {
            let url = format!("{}/{}", self.base_url, name);
            let response = match self.http_client.get(&url).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Venue request to {} failed: {}", url, e);
                    last_error = e.to_string();
                    continue;
                }
            };

            let is_json = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.contains("application/json"));

            if !response.status().is_success() || !is_json {
                warn!(
                    "Skipping venue candidate {} (status {}, json: {})",
                    url,
                    response.status(),
                    is_json
                );
                last_error = format!("{} returned {}", url, response.status());
                continue;
            }

            let venue: Venue = response.json().await?;
            venue.validate()?;
            info!("Loaded venue from {} with {} seats", url, venue.seat_count());
            return Ok(venue);
        }

        Err(VenueLoadError::Unavailable(last_error))
    }
}
