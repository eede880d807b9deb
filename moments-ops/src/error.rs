//! 操作工具統一錯誤類型定義
//!
//! 使用 thiserror crate 提供良好的錯誤鏈和上下文信息。

use thiserror::Error;

/// 操作工具錯誤類型
///
/// 涵蓋所有子系統的錯誤情況：
/// - Sui JSON-RPC 交互
/// - 交易構造與執行
/// - 簽名與密鑰加載
/// - 配置管理
#[derive(Error, Debug)]
pub enum OpsError {
    /// Sui 客戶端錯誤
    ///
    /// 當 RPC 響應格式不符合預期時返回此錯誤
    #[error("Sui client error: {0}")]
    SuiClient(String),

    /// JSON-RPC 錯誤響應
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// 交易執行失敗
    ///
    /// 帳本拒絕交易時原樣返回其錯誤信息
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// 交易已發出但結果未確認
    ///
    /// 攜帶本地計算的交易摘要，可據此在鏈上查詢
    #[error("Transaction {digest} was submitted but its result is unknown: {reason}")]
    Unconfirmed { digest: String, reason: String },

    /// 對象不存在
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Gas 不足
    #[error("Insufficient gas: {0}")]
    InsufficientGas(String),

    /// 無效的對象 ID 或地址
    #[error("Invalid object id: {0}")]
    InvalidObjectId(String),

    /// 配置錯誤
    #[error("Configuration error: {0}")]
    Config(String),

    /// 簽名錯誤
    #[error("Signing error: {0}")]
    Signing(String),

    /// 密鑰庫錯誤
    ///
    /// 當無法加載或保存私鑰時返回此錯誤
    #[error("Keystore error: {0}")]
    Keystore(String),

    /// HTTP 請求錯誤
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// 序列化/反序列化錯誤
    ///
    /// 當 JSON 或 BCS 序列化失敗時返回此錯誤
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O 錯誤
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 通用錯誤
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 類型別名
pub type Result<T> = std::result::Result<T, OpsError>;

impl OpsError {
    /// 是否為可重試的臨時錯誤（網絡或節點內部錯誤）
    pub fn is_transient(&self) -> bool {
        match self {
            OpsError::HttpRequest(_) | OpsError::Io(_) => true,
            // JSON-RPC internal error / server error range
            OpsError::Rpc { code, .. } => *code == -32603 || (-32099..=-32000).contains(code),
            _ => false,
        }
    }
}

/// 從 JSON 錯誤轉換
impl From<serde_json::Error> for OpsError {
    fn from(err: serde_json::Error) -> Self {
        OpsError::Serialization(err.to_string())
    }
}

/// 從 BCS 錯誤轉換
impl From<bcs::Error> for OpsError {
    fn from(err: bcs::Error) -> Self {
        OpsError::Serialization(err.to_string())
    }
}

/// 從簽名庫錯誤轉換
impl From<moments_signer::SignerError> for OpsError {
    fn from(err: moments_signer::SignerError) -> Self {
        OpsError::Signing(err.to_string())
    }
}
