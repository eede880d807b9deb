//! 配置管理模塊
//!
//! 負責加載和驗證操作工具配置。
//! 優先級（低 → 高）：環境默認值 → 配置文件 → `MOMENTS_*` 環境變量 → 命令行參數。

use crate::error::{OpsError, Result};
use crate::types::OpsConfig;
use config::{Config, Environment, File};
use std::path::Path;

/// 網絡別名對應的全節點 URL
pub fn resolve_rpc_url(network: &str) -> String {
    match network.trim().to_lowercase().as_str() {
        "mainnet" => "https://fullnode.mainnet.sui.io:443".to_string(),
        "testnet" => "https://fullnode.testnet.sui.io:443".to_string(),
        "devnet" => "https://fullnode.devnet.sui.io:443".to_string(),
        "localnet" => "http://127.0.0.1:9000".to_string(),
        _ => network.trim().to_string(),
    }
}

fn environment() -> Environment {
    Environment::with_prefix("MOMENTS").try_parsing(true)
}

fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<OpsConfig> {
    let config = builder
        .build()
        .map_err(|e| OpsError::Config(format!("Failed to load config: {}", e)))?;

    let ops_config: OpsConfig = config
        .try_deserialize()
        .map_err(|e| OpsError::Config(format!("Failed to parse config: {}", e)))?;

    validate_config(&ops_config)?;

    Ok(ops_config)
}

/// 從配置文件加載操作工具配置
///
/// # 參數
/// - `config_path`: 配置文件路徑（支持 TOML、JSON、YAML）
///
/// 文件中未出現的字段取 [`OpsConfig::default`]，`MOMENTS_*` 環境變量覆蓋文件。
///
/// # 示例
/// ```no_run
/// use moments_ops::config::load_config;
///
/// let config = load_config("moments.toml").expect("Failed to load config");
/// println!("Sui RPC: {}", config.sui_rpc_url);
/// ```
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<OpsConfig> {
    finish(
        Config::builder()
            .add_source(File::from(config_path.as_ref()))
            .add_source(environment()),
    )
}

/// 從環境變量加載配置
///
/// 環境變量前綴: `MOMENTS_`
/// 示例: `MOMENTS_PACKAGE_ID`, `MOMENTS_GAS_BUDGET`
pub fn load_config_from_env() -> Result<OpsConfig> {
    finish(Config::builder().add_source(environment()))
}

/// 有配置文件時讀文件，否則只讀環境變量
pub fn load(config_path: Option<&Path>) -> Result<OpsConfig> {
    match config_path {
        Some(path) => load_config(path),
        None => load_config_from_env(),
    }
}

/// 驗證配置的有效性
///
/// 檢查:
/// - 別名解析後的 RPC URL 為 http(s)
/// - gas budget 非零
/// - SOUV 類型非空
pub fn validate_config(config: &OpsConfig) -> Result<()> {
    let rpc_url = resolve_rpc_url(&config.sui_rpc_url);
    if !rpc_url.starts_with("http://") && !rpc_url.starts_with("https://") {
        return Err(OpsError::Config(format!(
            "Invalid Sui RPC URL: {}",
            config.sui_rpc_url
        )));
    }

    if config.gas_budget == 0 {
        return Err(OpsError::Config(
            "gas_budget must be greater than 0".to_string(),
        ));
    }

    if config.display_gas_budget == 0 {
        return Err(OpsError::Config(
            "display_gas_budget must be greater than 0".to_string(),
        ));
    }

    if config.souv_type.trim().is_empty() {
        return Err(OpsError::Config("souv_type must not be empty".to_string()));
    }

    if config.http_timeout_secs == 0 {
        return Err(OpsError::Config(
            "http_timeout_secs must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
