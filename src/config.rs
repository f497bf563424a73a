use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub assets: AssetConfig,
    pub views: ViewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 上游发票服务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// 请求超时(秒)，缺省为不设超时
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// 页面引用的静态资源 (原样嵌入页面)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    pub logo_url: String,
}

/// 视图回收：超过 `idle_ttl_secs` 未被访问的视图会被清理
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    pub idle_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            upstream: UpstreamConfig {
                base_url: "http://localhost:5000".to_string(),
                timeout_secs: None,
            },
            assets: AssetConfig {
                logo_url: "./logo.svg".to_string(),
            },
            views: ViewConfig {
                idle_ttl_secs: 1800,
                sweep_interval_secs: 60,
            },
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置
    ///
    /// 默认值作为底层，`INVOICE_` 前缀的环境变量覆盖，层级用 `__` 分隔，
    /// 例如 `INVOICE_UPSTREAM__BASE_URL`。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(
            Environment::with_prefix("INVOICE")
                .prefix_separator("_")
                .separator("__"),
        )
    }

    fn from_source(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
