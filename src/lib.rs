pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod service;

pub use api::build_router;
pub use config::AppConfig;
pub use error::{AppError, FetchError};
pub use service::{HttpInvoiceSource, InvoiceSource, ViewRegistry};

use config::AssetConfig;
use std::sync::Arc;

/// 共享状态：发票来源 + 视图注册表 + 静态资源配置
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn InvoiceSource>,
    pub views: Arc<ViewRegistry>,
    pub assets: Arc<AssetConfig>,
}

impl AppState {
    pub fn new(source: Arc<dyn InvoiceSource>, assets: AssetConfig) -> Self {
        Self {
            source,
            views: Arc::new(ViewRegistry::new()),
            assets: Arc::new(assets),
        }
    }
}
