use crate::client::{create_client, get_invoice, parse_base_url};
use crate::config::UpstreamConfig;
use crate::error::{AppError, FetchError};
use crate::models::InvoiceRecord;
use async_trait::async_trait;
use reqwest::{Client, Url};

/// 发票数据来源
#[async_trait]
pub trait InvoiceSource: Send + Sync {
    /// 按订单号拉取发票记录，调用方保证订单号已去空白且非空
    async fn fetch(&self, order_number: &str) -> Result<InvoiceRecord, FetchError>;
}

/// 基于上游 HTTP 服务的发票来源
pub struct HttpInvoiceSource {
    client: Client,
    base_url: Url,
}

impl HttpInvoiceSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self, AppError> {
        let base_url = parse_base_url(&config.base_url).map_err(AppError::BaseUrl)?;
        let client = create_client(config).map_err(AppError::Client)?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl InvoiceSource for HttpInvoiceSource {
    async fn fetch(&self, order_number: &str) -> Result<InvoiceRecord, FetchError> {
        get_invoice(&self.client, &self.base_url, order_number)
            .await
            .map_err(|e| {
                tracing::error!("Error fetching invoice data for order {}: {}", order_number, e);
                e
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unusable_base_url() {
        let config = UpstreamConfig {
            base_url: "ftp://files.example.com".to_string(),
            timeout_secs: None,
        };
        assert!(matches!(HttpInvoiceSource::new(&config), Err(AppError::BaseUrl(_))));

        let config = UpstreamConfig {
            base_url: "not a url".to_string(),
            timeout_secs: Some(3),
        };
        assert!(matches!(HttpInvoiceSource::new(&config), Err(AppError::BaseUrl(_))));
    }

    #[test]
    fn accepts_local_base_url() {
        let config = UpstreamConfig {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: Some(10),
        };
        let source = HttpInvoiceSource::new(&config).unwrap();
        assert_eq!(source.base_url().as_str(), "http://localhost:5000/");
    }
}
