use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user-initiated ping of a monitored site. Not persisted locally;
/// discarded after the attempt completes or fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingRequest {
    /// Backend-owned identifier of the monitored site.
    pub website_id: i64,
    /// Display/payload copy of the site address; the backend resolves the
    /// authoritative URL from `website_id`.
    pub url: String,
    /// Optional demo/discount code, forwarded verbatim to the backend.
    /// Never affects the on-chain fee.
    pub code: Option<String>,
}

impl PingRequest {
    pub fn new(website_id: i64, url: impl Into<String>) -> Self {
        Self {
            website_id,
            url: url.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Body of `POST /pings/ping/manual`. Field names follow the backend wire
/// format, not the internal type names.
#[derive(Debug, Clone, Serialize)]
pub struct ManualPingPayload {
    pub wid: i64,
    pub url: String,
    pub tx_hash: String,
    pub fee_paid_numeric: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Ping row as recorded by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct PingRecord {
    pub pid: i64,
    pub wid: i64,
    pub is_up: bool,
    #[serde(default)]
    pub latency_ms: Option<u64>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub fee_paid_numeric: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OnchainRecord {
    pub tx_hash: String,
    pub amount: f64,
    #[serde(default)]
    pub gas_used: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManualPingResponse {
    pub status: String,
    pub ping: PingRecord,
    #[serde(default)]
    pub onchain: Option<OnchainRecord>,
}

/// Error body the backend attaches to 4xx/5xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendErrorBody {
    pub error: String,
}

/// The backend's verdict on the monitored site, surfaced to callers once a
/// confirmed payment has been recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingOutcome {
    pub is_up: bool,
    pub latency_ms: Option<u64>,
    pub region: Option<String>,
}

impl From<PingRecord> for PingOutcome {
    fn from(record: PingRecord) -> Self {
        Self {
            is_up: record.is_up,
            latency_ms: record.latency_ms,
            region: record.region,
        }
    }
}

/// A site the signed-in validator may ping (`GET /websites/available-sites`).
#[derive(Debug, Clone, Deserialize)]
pub struct AvailableSite {
    pub wid: i64,
    pub url: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_uses_backend_field_names() {
        let payload = ManualPingPayload {
            wid: 42,
            url: "https://example.com".into(),
            tx_hash: "0xabc".into(),
            fee_paid_numeric: 0.0002,
            code: Some("CODE7-xyz123".into()),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "wid": 42,
                "url": "https://example.com",
                "tx_hash": "0xabc",
                "fee_paid_numeric": 0.0002,
                "code": "CODE7-xyz123",
            })
        );
    }

    #[test]
    fn payload_omits_absent_code() {
        let payload = ManualPingPayload {
            wid: 1,
            url: "https://example.com".into(),
            tx_hash: "0xabc".into(),
            fee_paid_numeric: 0.0002,
            code: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("code").is_none());
    }

    #[test]
    fn response_parses_with_minimal_ping_row() {
        let body = json!({
            "status": "recorded",
            "ping": { "pid": 9, "wid": 42, "is_up": true, "latency_ms": 82 },
        });
        let parsed: ManualPingResponse = serde_json::from_value(body).unwrap();
        let outcome = PingOutcome::from(parsed.ping);
        assert!(outcome.is_up);
        assert_eq!(outcome.latency_ms, Some(82));
        assert!(outcome.region.is_none());
    }
}
