use crate::error::{AlertError, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info};
use urlencoding::encode;

/// Thin client over the public Gemini v2 market data endpoints.
///
/// Bodies are handed back as untyped JSON; interpreting them is the
/// job of [`crate::source::PriceSource`].
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// `GET /v2/ticker/:symbol`
    pub async fn fetch_ticker(&self, symbol: &str) -> Result<Value> {
        info!("Requesting ticker data for symbol {}", symbol);
        let url = format!("{}/v2/ticker/{}", self.base_url, encode(&symbol.to_lowercase()));
        self.get_json(&url).await
    }

    /// `GET /v2/candles/:symbol/:time_frame`
    pub async fn fetch_candles(&self, symbol: &str, timeframe: &str) -> Result<Value> {
        info!("Requesting {} candle data for symbol {}", timeframe, symbol);
        let url = format!(
            "{}/v2/candles/{}/{}",
            self.base_url,
            encode(&symbol.to_lowercase()),
            encode(timeframe)
        );
        self.get_json(&url).await
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);

        let result = self.send(url).await;
        if let Err(e) = &result {
            error!("Unable to fetch data from Gemini API: {}", e);
        }
        result
    }

    async fn send(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AlertError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;

        debug!("{}", serde_json::to_string_pretty(&body).unwrap_or(text));

        Ok(body)
    }
}
