use crate::error::PingError;
use crate::models::{
    AvailableSite, BackendErrorBody, ManualPingPayload, ManualPingResponse, PingOutcome,
    PingRequest,
};
use crate::session::SessionContext;
use anyhow::{bail, Context, Result};
use ethers::types::H256;
use reqwest::header::AUTHORIZATION;

/// Translates a confirmed payment plus a [`PingRequest`] into one backend
/// call and interprets the verdict.
///
/// Exactly one outbound call per `report_ping` invocation, no idempotency
/// key and no local caching: at-most-once from this side. Re-reporting an
/// already-recorded hash is not prevented here; the backend rejects the
/// duplicate and that rejection is surfaced like any other.
pub struct ReportClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl ReportClient {
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Report a confirmed payment to the backend and return its verdict.
    /// Callers must only pass a hash the wallet gateway has confirmed.
    pub async fn report_ping(
        &self,
        request: &PingRequest,
        tx_hash: H256,
        fee_eth: f64,
    ) -> Result<PingOutcome, PingError> {
        let payload = ManualPingPayload {
            wid: request.website_id,
            url: request.url.clone(),
            tx_hash: format!("{:?}", tx_hash),
            fee_paid_numeric: fee_eth,
            code: request.code.clone(),
        };

        let response = self
            .http
            .post(format!("{}/pings/ping/manual", self.base_url))
            .header(AUTHORIZATION, self.session.bearer())
            .json(&payload)
            .send()
            .await
            .map_err(|e| PingError::ReportingFailed {
                message: e.to_string(),
                tx_hash,
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<BackendErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("backend returned {status}"));
            return Err(PingError::ReportingFailed { message, tx_hash });
        }

        let body: ManualPingResponse =
            response
                .json()
                .await
                .map_err(|e| PingError::ReportingFailed {
                    message: format!("unreadable backend response: {e}"),
                    tx_hash,
                })?;

        tracing::info!(
            status = %body.status,
            pid = body.ping.pid,
            is_up = body.ping.is_up,
            "Ping recorded by backend"
        );

        Ok(PingOutcome::from(body.ping))
    }

    /// Sites the signed-in validator may ping.
    pub async fn available_sites(&self) -> Result<Vec<AvailableSite>> {
        let response = self
            .http
            .get(format!("{}/websites/available-sites", self.base_url))
            .header(AUTHORIZATION, self.session.bearer())
            .send()
            .await
            .context("available-sites request failed")?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<BackendErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("backend returned {status}"));
            bail!("listing available sites failed: {message}");
        }

        response
            .json()
            .await
            .context("unreadable available-sites response")
    }
}
