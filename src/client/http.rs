use crate::config::UpstreamConfig;
use reqwest::{Client, Url};
use std::time::Duration;

/// 创建上游 HTTP 客户端
///
/// 未配置 `timeout_secs` 时不设超时。
pub fn create_client(config: &UpstreamConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

/// 解析并校验上游基础地址 (只接受 http/https)
pub fn parse_base_url(base_url: &str) -> Result<Url, String> {
    let url = Url::parse(base_url).map_err(|e| format!("{}: {}", base_url, e))?;
    match url.scheme() {
        "http" | "https" if !url.cannot_be_a_base() => Ok(url),
        other => Err(format!("{}: unsupported scheme {}", base_url, other)),
    }
}
