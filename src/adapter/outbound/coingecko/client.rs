//! CoinGecko NFT price client backed by the public `GET /nfts/{id}` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::PriceQuote;
use crate::error::{Error, Result};
use crate::port::PriceSource;

/// Public API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko NFT collection price client.
#[derive(Debug, Clone)]
pub struct CoinGecko {
    /// HTTP client for API requests.
    client: Client,
    /// API base URL without trailing slash.
    api_base: String,
    /// CoinGecko NFT collection id (e.g. "stones").
    nft_id: String,
}

impl CoinGecko {
    /// Create a client for `nft_id` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_base: impl Into<String>,
        nft_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            nft_id: nft_id.into(),
        })
    }

    fn url(&self) -> String {
        format!("{}/nfts/{}", self.api_base, self.nft_id)
    }
}

#[derive(Debug, Default, Deserialize)]
struct NftResponse {
    #[serde(default)]
    floor_price: Option<UsdAmount>,
    #[serde(default)]
    volume_24h: Option<UsdAmount>,
}

#[derive(Debug, Default, Deserialize)]
struct UsdAmount {
    #[serde(default)]
    usd: Option<f64>,
}

impl NftResponse {
    fn into_quote(self) -> Result<PriceQuote> {
        Ok(PriceQuote {
            floor_price_usd: usd_amount(self.floor_price)?,
            volume_24h_usd: usd_amount(self.volume_24h)?,
        })
    }
}

fn usd_amount(amount: Option<UsdAmount>) -> Result<Decimal> {
    match amount.and_then(|a| a.usd) {
        Some(value) => Decimal::try_from(value)
            .map_err(|e| Error::PriceSource(format!("unrepresentable amount {value}: {e}"))),
        None => Ok(Decimal::ZERO),
    }
}

#[async_trait]
impl PriceSource for CoinGecko {
    async fn fetch(&self) -> Result<PriceQuote> {
        let body: NftResponse = self
            .client
            .get(self.url())
            .header("accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        body.into_quote()
    }

    fn name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn url_joins_base_and_id() {
        let client =
            CoinGecko::new("https://api.example.com/v3/", "stones", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.url(), "https://api.example.com/v3/nfts/stones");
    }

    #[test]
    fn response_maps_to_quote() {
        let json = r#"{
            "id": "stones",
            "floor_price": {"native_currency": 0.01, "usd": 612.5},
            "volume_24h": {"native_currency": 1.2, "usd": 73500}
        }"#;

        let quote = serde_json::from_str::<NftResponse>(json)
            .unwrap()
            .into_quote()
            .unwrap();

        assert_eq!(quote.floor_price_usd, dec!(612.5));
        assert_eq!(quote.volume_24h_usd, dec!(73500));
    }

    #[test]
    fn missing_amounts_default_to_zero() {
        let quote = serde_json::from_str::<NftResponse>(r#"{"floor_price": {}}"#)
            .unwrap()
            .into_quote()
            .unwrap();

        assert_eq!(quote, PriceQuote::default());
    }

    #[test]
    fn null_amounts_default_to_zero() {
        let json = r#"{"floor_price": {"usd": null}, "volume_24h": null}"#;
        let quote = serde_json::from_str::<NftResponse>(json)
            .unwrap()
            .into_quote()
            .unwrap();

        assert_eq!(quote.floor_price_usd, Decimal::ZERO);
    }
}
