//! Remote scheme/statistics providers.
//!
//! [SchemeSource] abstracts where payloads come from so the service layer can
//! be driven by the HTTP API in production and by in-process fakes in tests.
//! Fetch failures are reported upward as [Error::Fetch]; the crate performs
//! no retries.

use async_trait::async_trait;

use crate::{
    error::Error,
    properties::{AyahStatRecord, SchemeRecord, SurahStatsWire},
};

#[async_trait]
pub trait SchemeSource: Send + Sync {
    /// The scheme hierarchy with aggregate count ranges.
    async fn fetch_schemes(&self) -> Result<Vec<SchemeRecord>, Error>;

    /// Per-ayah classification statistics.
    async fn fetch_ayah_stats(&self) -> Result<Vec<AyahStatRecord>, Error>;

    /// Per-surah count statistics, keyed by surah number strings as served.
    async fn fetch_surah_stats(&self) -> Result<SurahStatsWire, Error>;
}

#[cfg(feature = "client")]
pub use self::http::HttpSchemeSource;

#[cfg(feature = "client")]
mod http {
    use super::*;
    use crate::{config::Config, properties::StatsKind};
    use reqwest::Client;
    use serde::de::DeserializeOwned;
    use std::time::Duration;
    use url::Url;

    /// [SchemeSource] over the public HTTP API.
    pub struct HttpSchemeSource {
        client: Client,
        base_url: Url,
    }

    impl HttpSchemeSource {
        pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, Error> {
            let client = Client::builder()
                .timeout(request_timeout)
                .build()
                .map_err(|err| Error::Fetch(format!("HTTP client construction failed: {err}")))?;
            Ok(HttpSchemeSource {
                client,
                base_url: Url::parse(base_url)?,
            })
        }

        pub fn from_config(config: &Config) -> Result<Self, Error> {
            Self::new(
                &config.api_base_url,
                Duration::from_millis(config.request_timeout_ms),
            )
        }

        async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Error> {
            let url = self.base_url.join(endpoint)?;
            tracing::debug!("GET {url}");
            let response = self.client.get(url.clone()).send().await?;
            if !response.status().is_success() {
                return Err(Error::Fetch(format!(
                    "{url} returned status {}",
                    response.status()
                )));
            }
            Ok(response.json().await?)
        }
    }

    #[async_trait]
    impl SchemeSource for HttpSchemeSource {
        async fn fetch_schemes(&self) -> Result<Vec<SchemeRecord>, Error> {
            self.get_json(StatsKind::Aggregate.endpoint()).await
        }

        async fn fetch_ayah_stats(&self) -> Result<Vec<AyahStatRecord>, Error> {
            self.get_json(StatsKind::PerAyah.endpoint()).await
        }

        async fn fetch_surah_stats(&self) -> Result<SurahStatsWire, Error> {
            self.get_json(StatsKind::PerSurah.endpoint()).await
        }
    }
}
