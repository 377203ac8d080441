//! HTTP client for the back-office API.

use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use haulbook_core::{BookingId, PartyId, TruckId};
use haulbook_ledger::{DateRange, LedgerResponse};
use haulbook_parties::{
    Booking, PartialPaymentRequest, PartyDetails, PartyListQuery, PartySummary, TruckListQuery,
    TruckSummary,
};

use crate::config::ClientConfig;
use crate::envelope::{self, Page};
use crate::error::{ClientError, ClientResult};
use crate::resources::{PageQuery, Resource};

/// Thin typed wrapper over `reqwest`. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.http.request(method, self.config.url(path));
        if let Some(token) = self.config.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send and return the JSON body of a 2xx response.
    async fn send(&self, req: RequestBuilder, what: &str) -> ClientResult<Value> {
        tracing::debug!(what, "api request");

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(what, error = %e, "api request failed");
            ClientError::from(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            let message = envelope::error_message(status.as_u16(), &raw);
            tracing::warn!(what, status = status.as_u16(), %message, "api returned error");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(format!("{what}: {e}")))
    }

    async fn get_payload<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> ClientResult<T> {
        let body = self.send(self.request(Method::GET, path).query(query), what).await?;
        envelope::decode_payload(body)
    }

    // ---- party ledger ----------------------------------------------------

    /// `GET /ledger/party`
    pub async fn list_parties(&self, query: &PartyListQuery) -> ClientResult<Vec<PartySummary>> {
        self.get_payload("/ledger/party", &query.query_pairs(), "list parties")
            .await
    }

    /// `GET /ledger/party-details/:partyId`
    pub async fn party_details(&self, party_id: PartyId) -> ClientResult<PartyDetails> {
        self.get_payload(
            &format!("/ledger/party-details/{party_id}"),
            &[],
            "party details",
        )
        .await
    }

    /// `GET /ledger/party-tally/:partyId`
    pub async fn party_ledger(&self, party_id: PartyId, range: DateRange) -> ClientResult<LedgerResponse> {
        self.get_payload(
            &format!("/ledger/party-tally/{party_id}"),
            &range.query_pairs(),
            "party ledger",
        )
        .await
    }

    /// `POST /ledger/party-partial-payment`
    ///
    /// Validates locally first; an invalid request is never sent. Returns the
    /// server's confirmation message, if any.
    pub async fn submit_partial_payment(
        &self,
        payment: &PartialPaymentRequest,
        today: NaiveDate,
        outstanding: Option<Decimal>,
    ) -> ClientResult<Option<String>> {
        payment.validate(today, outstanding)?;

        let body = self
            .send(
                self.request(Method::POST, "/ledger/party-partial-payment").json(payment),
                "partial payment",
            )
            .await?;
        envelope::ensure_success(&body)?;

        tracing::info!(party_id = %payment.party_id, amount = %payment.amount, "partial payment recorded");
        Ok(body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    // ---- truck ledger ----------------------------------------------------

    /// `GET /vendor/truck`
    pub async fn list_trucks(&self, query: &TruckListQuery) -> ClientResult<Vec<TruckSummary>> {
        self.get_payload("/vendor/truck", &query.query_pairs(), "list trucks")
            .await
    }

    /// `GET /vendor/truck-tally/:truckId`
    pub async fn truck_ledger(&self, truck_id: TruckId, range: DateRange) -> ClientResult<LedgerResponse> {
        self.get_payload(
            &format!("/vendor/truck-tally/{truck_id}"),
            &range.query_pairs(),
            "truck ledger",
        )
        .await
    }

    // ---- bookings --------------------------------------------------------

    /// `GET /booking/one/:bookingId`, the source record for a booking PDF.
    pub async fn booking(&self, booking_id: BookingId) -> ClientResult<Booking> {
        self.get_payload(&format!("/booking/one/{booking_id}"), &[], "booking")
            .await
    }

    // ---- generic resources -----------------------------------------------

    pub async fn list_resource(&self, resource: Resource, query: &PageQuery) -> ClientResult<Page<Value>> {
        let body = self
            .send(
                self.request(Method::GET, resource.path()).query(&query.query_pairs()),
                resource.plural(),
            )
            .await?;
        envelope::decode_page(body)
    }
}
