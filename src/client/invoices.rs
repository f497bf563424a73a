use crate::error::FetchError;
use crate::models::InvoiceRecord;
use reqwest::{Client, StatusCode, Url};

/// 拼接发票地址：`{base}/api/invoices/{orderNumber}`
///
/// 订单号作为单独的路径段做百分号编码。
pub fn invoice_url(base: &Url, order_number: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(["api", "invoices", order_number]);
    }
    url
}

/// 查询单张发票 (单次请求，不重试)
pub async fn get_invoice(
    client: &Client,
    base: &Url,
    order_number: &str,
) -> Result<InvoiceRecord, FetchError> {
    let url = invoice_url(base, order_number);
    tracing::debug!("GET {}", url);

    let response = client.get(url).send().await?;
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound(order_number.to_string()));
    }
    if !status.is_success() {
        return Err(FetchError::Upstream(status.as_u16()));
    }

    let body = response.bytes().await?;
    let record = serde_json::from_slice::<InvoiceRecord>(&body)?;
    Ok(record)
}
