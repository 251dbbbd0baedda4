//! Thin `reqwest` wrapper shared by every adapter.
//!
//! Maps transport and status failures onto the `SeriesError` taxonomy so the
//! orchestrator can log a stable reason code per upstream.

use std::time::Duration;

use chainseries_core::{Capability, SeriesError};
use serde::de::DeserializeOwned;
use url::Url;

const USER_AGENT: &str = concat!("chainseries/", env!("CARGO_PKG_VERSION"));

pub(crate) struct HttpSource {
    connector: &'static str,
    client: reqwest::Client,
    base: String,
    timeout: Duration,
}

impl HttpSource {
    /// Validate `base_url` before building the source.
    pub(crate) fn new(
        connector: &'static str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, SeriesError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| SeriesError::InvalidArg(format!("{connector} base url {base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(SeriesError::InvalidArg(format!(
                "{connector} base url {base_url} cannot be a base"
            )));
        }
        Ok(Self::unchecked(connector, base_url, timeout))
    }

    /// Build without validating `base_url`; for compile-time constant endpoints.
    pub(crate) fn unchecked(connector: &'static str, base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            connector,
            client,
            base: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base
    }

    pub(crate) const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) const fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, SeriesError> {
        let mut url = Url::parse(&format!("{}/{}", self.base, path.trim_start_matches('/')))
            .map_err(|e| SeriesError::InvalidArg(format!("{}: {e}", self.connector)))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn map_transport(&self, err: &reqwest::Error, cap: Capability) -> SeriesError {
        if err.is_timeout() {
            SeriesError::provider_timeout(self.connector, cap.as_str())
        } else if err.is_connect() {
            SeriesError::Connect {
                connector: self.connector.to_string(),
                msg: err.to_string(),
            }
        } else if err.is_decode() || err.is_body() {
            SeriesError::Data(format!("{}: {err}", self.connector))
        } else {
            SeriesError::connector(self.connector, err.to_string())
        }
    }

    async fn send(
        &self,
        path: &str,
        query: &[(&str, String)],
        cap: Capability,
    ) -> Result<reqwest::Response, SeriesError> {
        let url = self.url(path, query)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(connector = self.connector, path = url.path(), "GET");
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_transport(&e, cap))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SeriesError::HttpStatus {
                connector: self.connector.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    pub(crate) async fn get_text(
        &self,
        path: &str,
        query: &[(&str, String)],
        cap: Capability,
    ) -> Result<String, SeriesError> {
        self.send(path, query, cap)
            .await?
            .text()
            .await
            .map_err(|e| self.map_transport(&e, cap))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        cap: Capability,
    ) -> Result<T, SeriesError> {
        let body = self
            .send(path, query, cap)
            .await?
            .bytes()
            .await
            .map_err(|e| self.map_transport(&e, cap))?;
        serde_json::from_slice(&body)
            .map_err(|e| SeriesError::Data(format!("{}: malformed payload: {e}", self.connector)))
    }
}

/// Calendar day of a unix timestamp in seconds.
pub(crate) fn day_of_secs(secs: i64) -> Option<chainseries_core::NaiveDate> {
    chrono::DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

/// Calendar day of a unix timestamp in milliseconds.
pub(crate) fn day_of_millis(ms: i64) -> Option<chainseries_core::NaiveDate> {
    chrono::DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

/// Unix seconds of midnight UTC on `date`.
pub(crate) fn midnight_secs(date: chainseries_core::NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

/// Reject an empty parse result as a payload error.
pub(crate) fn non_empty(
    series: chainseries_core::TimeSeries,
    connector: &str,
) -> Result<chainseries_core::TimeSeries, SeriesError> {
    if series.is_empty() {
        Err(SeriesError::Data(format!(
            "{connector}: no usable {} observations",
            series.metric()
        )))
    } else {
        Ok(series)
    }
}

pub(crate) fn unsupported_metric(cap: Capability, metric: chainseries_core::Metric) -> SeriesError {
    SeriesError::unsupported(format!("{cap}/{metric}"))
}
