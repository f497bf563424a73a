use crate::error::AppError;
use crate::models::InvoiceSummary;
use crate::render::{document_template, export_lines, page_template, DocumentTemplate};
use crate::service::calculate;
use crate::service::view::{mint_view_id, parse_view_id};
use crate::AppState;
use axum::{
    extract::{Form, Json, Path, Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;

/// 页面查询参数
#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub view: Option<String>,
}

/// 查询表单
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub view: Option<String>,
    #[serde(default)]
    pub order_number: String,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

fn view_location(view_id: &str) -> String {
    format!("/?view={}", view_id)
}

/// 发票查询页面；没有 (合法) 视图ID时分配一个新视图并跳转
pub async fn index(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Response {
    let Some(view_id) = parse_view_id(query.view.as_deref()) else {
        return Redirect::to(&view_location(&mint_view_id())).into_response();
    };
    let view = state.views.snapshot(&view_id);
    page_template(&view_id, &view, &state.assets).into_response()
}

/// 提交查询：视图进入 Loading，后台拉取，立即跳回页面
pub async fn search(State(state): State<AppState>, Form(form): Form<SearchForm>) -> Redirect {
    let view_id = parse_view_id(form.view.as_deref()).unwrap_or_else(mint_view_id);
    state
        .views
        .spawn_search(&view_id, &form.order_number, Arc::clone(&state.source));
    Redirect::to(&view_location(&view_id))
}

/// 关闭视图，丢弃已加载的发票
pub async fn close_view(State(state): State<AppState>, Path(view_id): Path<String>) -> Redirect {
    if let Some(view_id) = parse_view_id(Some(&view_id)) {
        if state.views.close(&view_id) {
            tracing::info!("View {} closed", view_id);
        }
    }
    Redirect::to("/")
}

fn required_order_number(raw: &str) -> Result<&str, AppError> {
    let order_number = raw.trim();
    if order_number.is_empty() {
        return Err(AppError::BadRequest("Order number is required".to_string()));
    }
    Ok(order_number)
}

/// 单张发票的打印页 (不经过视图状态)
pub async fn invoice_page(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<DocumentTemplate, AppError> {
    let record = state.source.fetch(required_order_number(&order_number)?).await?;
    Ok(document_template(&record, &state.assets))
}

/// 发票计算结果 (JSON)
pub async fn invoice_summary(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<InvoiceSummary>, AppError> {
    let record = state.source.fetch(required_order_number(&order_number)?).await?;
    Ok(Json(calculate(&record)))
}

/// 发票明细导出 (CSV)
pub async fn invoice_lines_csv(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Response, AppError> {
    let order_number = required_order_number(&order_number)?;
    let record = state.source.fetch(order_number).await?;
    let body = export_lines(&calculate(&record))?;

    let disposition = format!(
        "attachment; filename=\"invoice-{}.csv\"",
        order_number.replace(|c: char| !c.is_ascii_alphanumeric() && c != '-', "_")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
