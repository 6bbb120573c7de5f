use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 账本数据库配置 / Ledger database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub rocksdb_path: String,

    /// 事务锁等待超时(毫秒) / Transaction lock wait timeout (milliseconds)
    pub lock_timeout_ms: i64,

    pub write_buffer_size_mb: usize,
    pub max_write_buffer_number: i32,
    pub max_background_jobs: i32,
    pub use_fsync: bool,
    pub paranoid_checks: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            rocksdb_path: "./data/ledger".to_string(),
            lock_timeout_ms: 1000,
            write_buffer_size_mb: 64,
            max_write_buffer_number: 4,
            max_background_jobs: 4,
            use_fsync: true,
            paranoid_checks: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// EnvFilter 指令, RUST_LOG 优先 / EnvFilter directives, RUST_LOG wins
    pub filter: String,

    /// 日志文件目录(按天滚动),为空则只输出到 stdout
    /// Log file directory (daily rolling); stdout only when unset
    pub dir: Option<String>,
}

impl Config {
    pub fn new() -> Result<Self> {
        let db = DatabaseConfig::default();
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.rocksdb_path", db.rocksdb_path)?
            .set_default("database.lock_timeout_ms", db.lock_timeout_ms)?
            .set_default("database.write_buffer_size_mb", db.write_buffer_size_mb as u64)?
            .set_default("database.max_write_buffer_number", db.max_write_buffer_number)?
            .set_default("database.max_background_jobs", db.max_background_jobs)?
            .set_default("database.use_fsync", db.use_fsync)?
            .set_default("database.paranoid_checks", db.paranoid_checks)?
            .set_default(
                "logging.filter",
                "swap_ledger_server=debug,tower_http=debug",
            )?
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }
}
