use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use haulbook_client::{
    ApiClient, ClientConfig, ClientError, LedgerSource, LedgerTarget, PageQuery, Resource,
};
use haulbook_core::{PartyId, TruckId};
use haulbook_ledger::{DateRange, LedgerKind, compute_totals};
use haulbook_parties::{PartialPaymentRequest, PartyListQuery, PaymentMode};

#[derive(Default)]
struct Seen {
    queries: Vec<HashMap<String, String>>,
    payments: Vec<Value>,
    auth: Vec<String>,
}

type Shared = Arc<Mutex<Seen>>;

struct TestServer {
    base_url: String,
    seen: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let seen = Shared::default();
        let app = Router::new()
            .route("/ledger/party", get(parties))
            .route("/ledger/party-tally/:id", get(party_tally))
            .route("/ledger/party-details/:id", get(party_details))
            .route("/ledger/party-partial-payment", post(partial_payment))
            .route("/vendor/truck-tally/:id", get(truck_tally))
            .route("/bank", get(banks))
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            seen,
            handle,
        }
    }

    fn client(&self) -> ApiClient {
        ApiClient::new(ClientConfig::new(&self.base_url).with_token("t0ken")).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn record_auth(seen: &Shared, headers: &HeaderMap) {
    if let Some(v) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        seen.lock().unwrap().auth.push(v.to_string());
    }
}

async fn parties(State(seen): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    seen.lock().unwrap().queries.push(q);
    Json(json!({
        "success": true,
        "data": [
            {"partyId": 1, "name": "Acme Roadways", "totalFreight": "12000", "totalPaid": 2000, "balance": 10000},
            {"id": 2, "partyName": "Shree Cargo", "totalFreight": 0, "totalPaid": 0, "balance": null}
        ]
    }))
}

async fn party_tally(
    State(seen): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Json<Value> {
    record_auth(&seen, &headers);
    seen.lock().unwrap().queries.push(q);
    Json(json!({
        "party": {"id": id, "name": "Acme Roadways", "phone": "98200 00000"},
        "openingBalance": 0,
        "closingBalance": 3000,
        "closingBalanceType": "Dr",
        "ledger": [
            {"date": "2024-01-05", "particulars": "Booking #88", "voucherType": "Booking",
             "voucherNo": "BK-88", "debit": 5000, "credit": 0, "balance": 5000, "balanceType": "Dr"},
            {"date": "2024-01-09", "particulars": "Payment received", "voucherType": "Payment",
             "voucherNo": null, "debit": "", "credit": "2000", "balance": 3000, "balanceType": "Dr"}
        ]
    }))
}

async fn party_details(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!({"success": false, "message": "Party not found"}))
}

async fn partial_payment(
    State(seen): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    record_auth(&seen, &headers);
    seen.lock().unwrap().payments.push(body);
    Json(json!({"success": true, "message": "Payment recorded"}))
}

async fn truck_tally(Path(_id): Path<i64>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"success": false, "message": "Truck not found"})),
    )
}

async fn banks(State(seen): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let page: u32 = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    seen.lock().unwrap().queries.push(q);
    Json(json!({
        "success": true,
        "data": [{"id": page, "bankName": format!("Bank {page}")}],
        "totalPages": 3,
        "count": 21
    }))
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[tokio::test]
async fn party_ledger_sends_range_and_decodes_statement() {
    let server = TestServer::spawn().await;
    let client = server.client();

    let range = DateRange::new(Some(d(2024, 1, 1)), Some(d(2024, 1, 31))).unwrap();
    let statement = client
        .fetch_ledger(LedgerTarget::Party(PartyId::new(7)), range)
        .await
        .unwrap();

    assert_eq!(statement.kind(), LedgerKind::Party);
    assert_eq!(statement.counterparty.display_name(), "Acme Roadways");
    assert_eq!(statement.ledger.len(), 2);

    let totals = compute_totals(&statement.ledger);
    assert_eq!(totals.total_debit, Decimal::from(5000));
    assert_eq!(totals.total_credit, Decimal::from(2000));

    let seen = server.seen.lock().unwrap();
    let q = &seen.queries[0];
    assert_eq!(q.get("fromDate").map(String::as_str), Some("2024-01-01"));
    assert_eq!(q.get("toDate").map(String::as_str), Some("2024-01-31"));
    assert_eq!(seen.auth, vec!["Bearer t0ken".to_string()]);
}

#[tokio::test]
async fn unbounded_range_sends_no_date_params() {
    let server = TestServer::spawn().await;
    server
        .client()
        .party_ledger(PartyId::new(7), DateRange::all())
        .await
        .unwrap();

    let seen = server.seen.lock().unwrap();
    assert!(seen.queries[0].is_empty());
}

#[tokio::test]
async fn party_list_is_unwrapped_from_envelope() {
    let server = TestServer::spawn().await;
    let query = PartyListQuery {
        search: Some("acme".into()),
        ..PartyListQuery::default()
    };
    let parties = server.client().list_parties(&query).await.unwrap();

    assert_eq!(parties.len(), 2);
    assert_eq!(parties[1].name, "Shree Cargo");
    assert_eq!(parties[1].balance, Decimal::ZERO);
    assert_eq!(
        server.seen.lock().unwrap().queries[0].get("search").map(String::as_str),
        Some("acme")
    );
}

#[tokio::test]
async fn success_false_surfaces_server_message() {
    let server = TestServer::spawn().await;
    let err = server.client().party_details(PartyId::new(404)).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(m) if m == "Party not found"));
}

#[tokio::test]
async fn error_status_is_an_api_error() {
    let server = TestServer::spawn().await;
    let err = server
        .client()
        .fetch_ledger(LedgerTarget::Truck(TruckId::new(3)), DateRange::all())
        .await
        .unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Truck not found");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_payment_never_reaches_the_server() {
    let server = TestServer::spawn().await;
    let payment = PartialPaymentRequest {
        party_id: PartyId::new(1),
        amount: Decimal::ZERO,
        payment_date: Some(d(2024, 2, 1)),
        payment_mode: PaymentMode::Upi,
        reference_no: None,
        remarks: None,
        booking_ids: Vec::new(),
    };

    let err = server
        .client()
        .submit_partial_payment(&payment, d(2024, 2, 1), None)
        .await
        .unwrap_err();

    let ClientError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert!(errors.for_field("amount").is_some());
    assert!(errors.for_field("referenceNo").is_some());
    assert!(server.seen.lock().unwrap().payments.is_empty());
}

#[tokio::test]
async fn valid_payment_is_posted() {
    let server = TestServer::spawn().await;
    let payment = PartialPaymentRequest {
        party_id: PartyId::new(1),
        amount: Decimal::new(150050, 2),
        payment_date: Some(d(2024, 2, 1)),
        payment_mode: PaymentMode::Cash,
        reference_no: None,
        remarks: Some("part of January".into()),
        booking_ids: Vec::new(),
    };

    let message = server
        .client()
        .submit_partial_payment(&payment, d(2024, 2, 1), Some(Decimal::from(10000)))
        .await
        .unwrap();
    assert_eq!(message.as_deref(), Some("Payment recorded"));

    let seen = server.seen.lock().unwrap();
    let body = &seen.payments[0];
    assert_eq!(body["partyId"], json!(1));
    assert_eq!(body["amount"], json!(1500.5));
    assert_eq!(body["paymentDate"], json!("2024-02-01"));
    assert_eq!(body["paymentMode"], json!("Cash"));
    assert!(body.get("referenceNo").is_none());
}

#[tokio::test]
async fn resource_pages_follow_the_requested_page() {
    let server = TestServer::spawn().await;
    let page = server
        .client()
        .list_resource(Resource::Bank, &PageQuery::page(2).with_search("sbi"))
        .await
        .unwrap();

    assert_eq!(page.total_pages, 3);
    assert_eq!(page.count, 21);
    assert_eq!(page.data[0]["bankName"], json!("Bank 2"));

    let seen = server.seen.lock().unwrap();
    assert_eq!(seen.queries[0].get("limit").map(String::as_str), Some("10"));
    assert_eq!(seen.queries[0].get("search").map(String::as_str), Some("sbi"));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
    let err = client.list_parties(&PartyListQuery::default()).await.unwrap_err();
    assert!(err.is_network(), "got {err:?}");
}
