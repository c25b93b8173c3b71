//! InfluxDB v2 implementation of TimeSeriesStore

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, instrument};

use presence_core::traits::{RepoResult, TimeSeriesStore};
use presence_core::{Point, Record, SeriesQuery};

use crate::client::{create_http_client, InfluxConnection};
use crate::codec::{decode_annotated_csv, encode_point, query_body, render_flux};

use super::error::StoreError;

/// InfluxDB v2 HTTP backend
#[derive(Clone)]
pub struct InfluxStore {
    http: Client,
    connection: InfluxConnection,
}

impl InfluxStore {
    /// Create a new InfluxStore with its own HTTP client
    pub fn new(connection: InfluxConnection) -> Result<Self, StoreError> {
        let http = create_http_client(&connection)?;
        Ok(Self { http, connection })
    }

    /// Create a store sharing an existing client
    pub fn with_client(http: Client, connection: InfluxConnection) -> Self {
        Self { http, connection }
    }

    pub fn connection(&self) -> &InfluxConnection {
        &self.connection
    }

    async fn write_line(&self, line: String) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.connection.write_url())
            .query(&[
                ("org", self.connection.org.as_str()),
                ("bucket", self.connection.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header(AUTHORIZATION, self.connection.auth_header())
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(line)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::status(status, &body));
        }
        Ok(())
    }

    async fn run_flux(&self, flux: &str) -> Result<Vec<Record>, StoreError> {
        let response = self
            .http
            .post(self.connection.query_url())
            .query(&[("org", self.connection.org.as_str())])
            .header(AUTHORIZATION, self.connection.auth_header())
            .header(ACCEPT, "application/csv")
            .json(&query_body(flux))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::status(status, &body));
        }
        decode_annotated_csv(&body)
    }
}

#[async_trait]
impl TimeSeriesStore for InfluxStore {
    #[instrument(skip(self, point), fields(measurement = %point.measurement))]
    async fn write_point(&self, point: Point) -> RepoResult<()> {
        let line = encode_point(&point)?;
        self.write_line(line).await?;
        Ok(())
    }

    #[instrument(skip(self, query), fields(measurement = %query.measurement))]
    async fn query(&self, query: &SeriesQuery) -> RepoResult<Vec<Record>> {
        let flux = render_flux(&self.connection.bucket, query);
        debug!(%flux, "Running Flux query");

        let records = self.run_flux(&flux).await?;
        debug!(rows = records.len(), "Query returned");
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> RepoResult<()> {
        let response = self
            .http
            .get(self.connection.health_url())
            .send()
            .await
            .map_err(StoreError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::status(status, &body).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use presence_core::DomainError;

    fn unreachable_store() -> InfluxStore {
        // Port 9 (discard) is closed on any sane test host
        InfluxStore::new(InfluxConnection {
            url: "http://127.0.0.1:9".to_string(),
            timeout: std::time::Duration::from_millis(500),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_store_is_a_store_error() {
        let store = unreachable_store();

        let err = store.health_check().await.unwrap_err();
        assert!(matches!(err, DomainError::StoreError(_)));

        let query = SeriesQuery::new("voice_events", chrono::Utc::now());
        assert!(store.query(&query).await.unwrap_err().is_collaborator());
    }

    #[tokio::test]
    async fn test_invalid_point_fails_before_sending() {
        let store = unreachable_store();
        let err = store
            .write_point(Point::new("voice_events", chrono::Utc::now()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no fields"));
    }
}
