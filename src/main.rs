use gst_invoice_viewer::{build_router, AppConfig, AppState, HttpInvoiceSource};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env()?;
    info!("Starting server with config: {:?}", config);

    // 上游发票服务客户端
    let source = HttpInvoiceSource::new(&config.upstream)?;
    info!("Invoice upstream: {}", source.base_url());

    let state = AppState::new(Arc::new(source), config.assets.clone());

    // 定期回收空闲视图
    state.views.spawn_sweeper(&config.views);
    info!(
        "Idle views expire after {}s (sweep every {}s)",
        config.views.idle_ttl_secs, config.views.sweep_interval_secs
    );

    let app = build_router(state);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("Endpoints:");
    info!("  GET  /                                   - invoice view");
    info!("  POST /search                             - search by order number");
    info!("  POST /views/:view_id/close               - close a view");
    info!("  GET  /invoices/:order_number             - printable invoice");
    info!("  GET  /api/invoices/:order_number/summary - calculated totals (JSON)");
    info!("  GET  /invoices/:order_number/lines.csv   - line breakdown (CSV)");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
