//! HTTP fetch collaborator for the forecast query interface.
//!
//! The client only moves JSON; all interpretation happens in
//! [`crate::payload`] and the engine modules.

use crate::config::ClientConfig;
use crate::error::{ForecastError, Result};
use crate::payload::{
    DataQualityResponse, ForecastResponse, RiskLevelsResponse, TrendAnalysisResponse,
    UnifiedResponse, DATA_QUALITY_ENDPOINT, FORECAST_ENDPOINT, RISK_LEVELS_ENDPOINT,
    TREND_ANALYSIS_ENDPOINT, UNIFIED_ENDPOINT,
};
use crate::selection::Selection;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct ForecastClient {
    config: ClientConfig,
    http: Client,
}

impl ForecastClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(ForecastClient { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET `endpoint` and decode the body, retrying transport failures and
    /// non-200 statuses with exponential backoff.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.config.endpoint_url(endpoint);
        let max_tries = self.config.max_retries + 1;
        let mut backoff = self.config.retry_backoff;
        let mut attempt = 1;
        loop {
            let failure = match self.http.get(&url).query(query).send().await {
                Ok(response) if response.status() == StatusCode::OK => {
                    let body = response.text().await?;
                    info!("Fetched {} ({} bytes)", endpoint, body.len());
                    return Ok(serde_json::from_str(&body)?);
                }
                Ok(response) => {
                    let status = response.status();
                    warn!(
                        "Attempt {}/{}: Bad response status for {}: {}",
                        attempt, max_tries, endpoint, status
                    );
                    ForecastError::HttpStatus { endpoint, status }
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{}: Request failed for {}: {}",
                        attempt, max_tries, endpoint, e
                    );
                    ForecastError::Network(e)
                }
            };
            if attempt >= max_tries {
                warn!("All attempts failed for {}", endpoint);
                return Err(failure);
            }
            info!(
                "Sleeping for {} milliseconds before retry for {}",
                backoff.as_millis(),
                endpoint
            );
            tokio::time::sleep(backoff).await;
            backoff *= 2;
            attempt += 1;
        }
    }

    pub async fn forecast(&self, lake_id: &str) -> Result<ForecastResponse> {
        self.get_json(FORECAST_ENDPOINT, &[("lake_id", lake_id)]).await
    }

    pub async fn trend_analysis(&self, lake_id: &str) -> Result<TrendAnalysisResponse> {
        self.get_json(TREND_ANALYSIS_ENDPOINT, &[("lake_id", lake_id)])
            .await
    }

    pub async fn risk_levels(&self, lake_id: &str) -> Result<RiskLevelsResponse> {
        self.get_json(RISK_LEVELS_ENDPOINT, &[("lake_id", lake_id)])
            .await
    }

    pub async fn data_quality(&self, lake_id: &str) -> Result<DataQualityResponse> {
        self.get_json(DATA_QUALITY_ENDPOINT, &[("lake_id", lake_id)])
            .await
    }

    pub async fn unified(&self, selection: &Selection) -> Result<UnifiedResponse> {
        self.get_json(
            UNIFIED_ENDPOINT,
            &[
                ("lake_id", selection.lake_id.as_str()),
                ("horizon", selection.horizon.as_str()),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const FORECAST_BODY: &str =
        r#"{"status":"success","years":[2023,2024],"actual":[1.0,null],"predicted":[null,2.0]}"#;

    fn test_config(base_url: String, max_retries: u32, retry_backoff: Duration) -> ClientConfig {
        ClientConfig {
            base_url,
            timeout: Duration::from_secs(5),
            max_retries,
            retry_backoff,
        }
    }

    /// Serve one canned response per connection, in order, repeating the
    /// last one. Returns the base URL and a request counter.
    async fn serve(statuses: Vec<u16>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let status = statuses[n.min(statuses.len() - 1)];
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(read) => request.extend_from_slice(&buf[..read]),
                    }
                }
                let body = if status == 200 { FORECAST_BODY } else { "{}" };
                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        (format!("http://{addr}"), hits)
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // nothing listens on the discard port
        let config = test_config("http://127.0.0.1:9".to_string(), 1, Duration::from_millis(1));
        let client = ForecastClient::new(config).unwrap();
        let err = client.forecast("lake-7").await.unwrap_err();
        assert!(matches!(err, ForecastError::Network(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_retried_until_success() {
        let (base_url, hits) = serve(vec![500, 503, 200]).await;
        let config = test_config(base_url, 2, Duration::from_millis(40));
        let client = ForecastClient::new(config).unwrap();

        let started = Instant::now();
        let response = client.forecast("lake-7").await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(response.status, crate::payload::ResponseStatus::Success);
        assert_eq!(response.years, vec![2023, 2024]);
        // back-off doubles: 40ms then 80ms
        assert!(elapsed >= Duration::from_millis(120), "retried after {elapsed:?}");
    }

    #[tokio::test]
    async fn test_exhausted_retries_report_last_status() {
        let (base_url, hits) = serve(vec![500]).await;
        let config = test_config(base_url, 2, Duration::from_millis(1));
        let client = ForecastClient::new(config).unwrap();

        let err = client.risk_levels("lake-7").await.unwrap_err();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        match err {
            ForecastError::HttpStatus { endpoint, status } => {
                assert_eq!(endpoint, RISK_LEVELS_ENDPOINT);
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("expected an HTTP status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_retries_means_one_attempt() {
        let (base_url, hits) = serve(vec![500, 200]).await;
        let config = test_config(base_url, 0, Duration::from_millis(1));
        let client = ForecastClient::new(config).unwrap();

        assert!(client.forecast("lake-7").await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
