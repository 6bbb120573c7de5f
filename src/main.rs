use axum::Router;
use std::sync::Arc;
use swap_ledger_server::{config, db, docs, router, LedgerManager};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// 初始化日志: stdout + 可选的按天滚动文件
/// Initialize logging: stdout plus an optional daily rolling file
fn init_tracing(logging: &config::LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let (file_layer, guard) = match &logging.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "swap-ledger.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() {
    // 加载配置
    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ 配置加载失败: {}", e);
            std::process::exit(1);
        }
    };

    // 初始化日志
    let _log_guard = init_tracing(&config.logging);
    tracing::info!("启动 Swap Ledger Server...");
    tracing::info!("✅ 配置加载成功");

    // 初始化 RocksDB
    let storage = match db::LedgerStorage::new(&config.database) {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            tracing::error!("❌ RocksDB 初始化失败: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("✅ RocksDB 初始化成功");

    let ledger = Arc::new(LedgerManager::new(storage));

    // 创建 CORS 层
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 创建路由
    let api_router = router::create_router(ledger);

    // 创建 Swagger UI
    let swagger_ui = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", docs::ApiDoc::openapi());

    // 组合所有路由
    let app = Router::new()
        .merge(swagger_ui)
        .merge(api_router)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // 绑定地址
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("❌ 端口绑定失败 {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("服务器启动成功！");
    tracing::info!("访问 http://localhost:{}/health 测试接口", config.server.port);
    tracing::info!("访问 http://localhost:{}/swagger-ui 查看 API 文档", config.server.port);

    // 启动服务器
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("❌ 服务器异常退出: {}", e);
        std::process::exit(1);
    }
}
