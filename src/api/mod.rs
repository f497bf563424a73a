pub mod handlers;

pub use handlers::*;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;

/// 构建路由
pub fn build_router(state: AppState) -> Router {
    // 页面与视图生命周期
    let view_routes = Router::new()
        .route("/", get(index))
        .route("/search", post(search))
        .route("/views/:view_id/close", post(close_view));

    // 单张发票的无状态投影
    let invoice_routes = Router::new()
        .route("/invoices/:order_number", get(invoice_page))
        .route("/invoices/:order_number/lines.csv", get(invoice_lines_csv))
        .route("/api/invoices/:order_number/summary", get(invoice_summary));

    Router::new()
        .route("/health", get(health_check))
        .merge(view_routes)
        .merge(invoice_routes)
        .layer(ServiceBuilder::new())
        .with_state(state)
}
