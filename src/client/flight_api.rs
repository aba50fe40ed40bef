use async_trait::async_trait;

use crate::{
    client::flight_store::{FlightDraft, FlightRecord},
    config::FlightApiConfig,
    error::{AppError, Result},
};

/// Transport seam for the flight resource API. The store only ever talks to
/// this trait, so tests can swap in an in-memory implementation.
#[async_trait]
pub trait FlightTransport: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<FlightRecord>>;
    async fn create(&self, draft: &FlightDraft) -> Result<()>;
    async fn update(&self, flight_id: &str, draft: &FlightDraft) -> Result<()>;
    async fn delete(&self, flight_id: &str) -> Result<()>;
}

pub struct HttpFlightTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFlightTransport {
    pub fn new(config: FlightApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(AppError::External(format!(
                "Flight API returned {}",
                response.status()
            )))
        }
    }
}

#[async_trait]
impl FlightTransport for HttpFlightTransport {
    async fn fetch_all(&self) -> Result<Vec<FlightRecord>> {
        let response = self.http.get(self.url("/flight")).send().await?;
        let flights = Self::check(response).await?.json().await?;
        Ok(flights)
    }

    async fn create(&self, draft: &FlightDraft) -> Result<()> {
        let response = self.http.post(self.url("/flight")).json(draft).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update(&self, flight_id: &str, draft: &FlightDraft) -> Result<()> {
        let response = self
            .http
            .put(self.url(&format!("/flight/{}", flight_id)))
            .json(draft)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, flight_id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/flight/{}", flight_id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
