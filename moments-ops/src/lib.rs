//! moments 合約操作工具
//!
//! 本 crate 實現 moments Move 模塊的鏈下操作員工具:
//! 1. 加載配置與操作員身份（助記詞、私鑰文件或 Sui keystore）
//! 2. 將合約操作編譯為可編程交易計劃
//! 3. 解析對象、選擇 gas、簽名並提交交易
//! 4. 生成和驗證帶 nonce 的 Ed25519 簽名
//!
//! # 架構
//!
//! ```text
//! ┌──────────────────┐
//! │ MomentsOperation │  ← 類型化合約調用
//! └────────┬─────────┘
//!          │ plan()
//!          ▼
//! ┌──────────────────┐      ┌──────────────┐
//! │    Submitter     │ ───▶ │ LedgerClient │  ← JSON-RPC
//! └────────┬─────────┘      └──────────────┘
//!          │
//!     ┌────┴─────┬───────────┐
//!     ▼          ▼           ▼
//! Transaction  Keystore    Config
//!   (BCS)
//! ```
//!
//! # 示例用法
//!
//! ```no_run
//! use moments_ops::{
//!     config::load_config_from_env, keystore::load_identity, JsonRpcLedgerClient,
//!     MomentsContext, MomentsOperation, Submitter,
//! };
//! use moments_signer::KeyProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_from_env()?;
//!     let provider = KeyProvider::new();
//!     let keypair = load_identity(&provider, &config)?;
//!
//!     let client = JsonRpcLedgerClient::from_config(&config)?;
//!     let submitter = Submitter::new(&client, keypair);
//!
//!     let ctx = MomentsContext::from_config(&config)?;
//!     let plan = MomentsOperation::NewEvent { duration_ms: 86_400_000 }
//!         .plan(&ctx, submitter.sender())?;
//!
//!     let submission = submitter.submit(&plan).await?;
//!     println!("Event: {:?}", submission.matched_object_id());
//!
//!     Ok(())
//! }
//! ```

// 公開模塊
pub mod config;
pub mod error;
pub mod keystore;
pub mod moments;
pub mod retry;
pub mod submitter;
pub mod sui_client;
pub mod transaction;
pub mod types;

// Re-export 常用類型
pub use error::{OpsError, Result};
pub use moments::{CallPlan, DisplayFields, ExpectedChange, MomentsContext, MomentsOperation, NftKind};
pub use submitter::{Submission, Submitter};
pub use sui_client::{JsonRpcLedgerClient, LedgerClient};
pub use types::{ObjectId, OpsConfig, SuiAddress};
