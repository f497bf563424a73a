//! 集成测试公共设施：本地起一个假的上游发票服务

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use gst_invoice_viewer::config::{AssetConfig, UpstreamConfig};
use gst_invoice_viewer::models::InvoiceRecord;
use gst_invoice_viewer::{build_router, AppState, FetchError, HttpInvoiceSource, InvoiceSource};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

pub const LOGO_URL: &str = "/static/logo.svg";

/// 假上游
///
/// 订单号决定响应：
/// `missing` -> 404, `boom` -> 500, `garbled` -> 非 JSON, `partial` -> 缺字段，
/// `IGST-` 开头 -> 跨邦发票，其余 -> 同邦发票。
pub struct MockUpstream {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl MockUpstream {
    pub async fn spawn() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/api/invoices/:order_number", get(serve_invoice))
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let addr = listener.local_addr().expect("mock upstream addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock upstream");
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
            handle,
        }
    }

    /// 已收到的请求数
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig {
            base_url: self.base_url.clone(),
            timeout_secs: Some(5),
        }
    }

    pub fn source(&self) -> HttpInvoiceSource {
        HttpInvoiceSource::new(&self.upstream_config()).expect("source")
    }

    pub fn app(&self) -> Router {
        app_with(Arc::new(self.source()))
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_invoice(
    State(hits): State<Arc<AtomicUsize>>,
    Path(order_number): Path<String>,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    match order_number.as_str() {
        "missing" => StatusCode::NOT_FOUND.into_response(),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "database down").into_response(),
        "garbled" => Response::builder()
            .status(StatusCode::OK)
            .header("content-type", "application/json")
            .body(Body::from("{\"seller\": "))
            .expect("garbled response"),
        "partial" => Json(json!({ "seller": { "name": "Acme" } })).into_response(),
        other if other.starts_with("IGST-") => {
            Json(invoice_json(other, "KARNATAKA", "TAMIL NADU")).into_response()
        }
        other => Json(invoice_json(other, "KARNATAKA", "KARNATAKA")).into_response(),
    }
}

pub fn app_with(source: Arc<dyn InvoiceSource>) -> Router {
    build_router(AppState::new(source, assets()))
}

/// 受控的发票来源：每个订单号的请求都挂起，直到测试调用 `release`
#[derive(Default)]
pub struct GatedSource {
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    finished: AtomicUsize,
}

impl GatedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn gate(&self, order_number: &str) -> Arc<Notify> {
        self.gates
            .lock()
            .unwrap()
            .entry(order_number.to_string())
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    /// 放行该订单号的请求 (可以早于请求到达)
    pub fn release(&self, order_number: &str) {
        self.gate(order_number).notify_one();
    }

    /// 已返回的请求数
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InvoiceSource for GatedSource {
    async fn fetch(&self, order_number: &str) -> Result<InvoiceRecord, FetchError> {
        let gate = self.gate(order_number);
        gate.notified().await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        serde_json::from_value(invoice_json(order_number, "KARNATAKA", "KARNATAKA"))
            .map_err(FetchError::from)
    }
}

pub fn assets() -> AssetConfig {
    AssetConfig {
        logo_url: LOGO_URL.to_string(),
    }
}

/// 单行发票：100 x 2 折扣 10，税率 18%，运费 50
pub fn invoice_json(order_number: &str, supply: &str, delivery: &str) -> Value {
    json!({
        "seller": {
            "name": "Acme Retail Pvt Ltd",
            "address": "12 MG Road\nBengaluru 560001",
            "pan": "AAACA1234A",
            "gst": "29AAACA1234A1Z5"
        },
        "buyer": { "name": "R. Iyer", "address": "4 Anna Salai\nChennai", "stateCode": "33" },
        "order": { "number": order_number, "date": "01.02.2024" },
        "invoice": { "number": format!("INV-{}", order_number), "details": "KA-1001", "date": "02.02.2024", "reverseCharge": false },
        "placeOfSupply": supply,
        "placeOfDelivery": delivery,
        "items": [
            { "description": "Kettle, steel", "unitPrice": 100, "quantity": 2, "discount": 10, "taxRate": 0.18, "shippingCharges": 50 }
        ],
        "signatureImage": "https://cdn.example.com/sig.png"
    })
}

pub async fn body_string(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
