//! Sui 帳本客戶端模塊
//!
//! 負責與 Sui 全節點交互：
//! - 查詢餘額與 gas 幣
//! - 查詢對象引用與所有權
//! - 查詢參考 gas 價格
//! - 提交已簽名交易
//!
//! # 架構說明
//!
//! [`LedgerClient`] trait 是提交流程唯一依賴的接口，測試中以內存實現替代。
//! [`JsonRpcLedgerClient`] 通過 JSON-RPC 2.0 實現該接口，
//! 只讀調用在臨時錯誤時按指數退避重試，交易執行從不重試。

use crate::config::resolve_rpc_url;
use crate::error::{OpsError, Result};
use crate::retry::{retry_when, RetryConfig};
use crate::transaction::SignedTransaction;
use crate::types::{
    json_u64, ExecutionOutcome, GasCoin, ObjectId, ObjectInfo, ObjectRef, OpsConfig, Owner,
    SuiAddress,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// SUI 幣類型
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// 單頁 gas 幣數量上限
const GAS_COIN_PAGE_SIZE: u64 = 50;

/// gas 幣分頁查詢的頁數上限
const MAX_GAS_COIN_PAGES: usize = 100;

/// 帳本接口
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// 地址的 SUI 總餘額（MIST）
    async fn get_balance(&self, owner: &SuiAddress) -> Result<u128>;

    /// 對象的最新引用與所有權
    async fn get_object(&self, id: &ObjectId) -> Result<ObjectInfo>;

    /// 地址擁有的 SUI 幣
    async fn get_gas_coins(&self, owner: &SuiAddress) -> Result<Vec<GasCoin>>;

    /// 參考 gas 價格（MIST）
    async fn reference_gas_price(&self) -> Result<u64>;

    /// 提交交易並等待本地執行
    async fn execute_transaction(&self, tx: &SignedTransaction) -> Result<ExecutionOutcome>;
}

/// JSON-RPC 帳本客戶端
pub struct JsonRpcLedgerClient {
    http: reqwest::Client,
    rpc_url: String,
    retry: RetryConfig,
    next_id: AtomicU64,
}

impl JsonRpcLedgerClient {
    pub fn new(rpc_url: &str, timeout: Duration, retry: RetryConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        info!("Using Sui RPC endpoint {}", rpc_url);

        Ok(Self {
            http,
            rpc_url: rpc_url.to_string(),
            retry,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn from_config(config: &OpsConfig) -> Result<Self> {
        Self::new(
            &resolve_rpc_url(&config.sui_rpc_url),
            Duration::from_secs(config.http_timeout_secs),
            RetryConfig::with_max_retries(config.rpc_max_retries),
        )
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!(method, id, "Sending JSON-RPC request");

        let response: Value = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_rpc_response(response)
    }

    /// 只讀調用，臨時錯誤時重試
    async fn read(&self, method: &str, params: Value) -> Result<Value> {
        retry_when(
            method,
            &self.retry,
            || self.call(method, params.clone()),
            OpsError::is_transient,
        )
        .await
    }
}

/// 取出 `result`，或把 `error` 轉為 [`OpsError::Rpc`]
fn parse_rpc_response(mut response: Value) -> Result<Value> {
    if let Some(error) = response.get("error") {
        return Err(OpsError::Rpc {
            code: error.get("code").and_then(|c| c.as_i64()).unwrap_or_default(),
            message: error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    match response.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(OpsError::SuiClient(
            "JSON-RPC response has neither result nor error".to_string(),
        )),
    }
}

fn str_field<'a>(value: &'a Value, field: &str) -> Result<&'a str> {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| OpsError::SuiClient(format!("Missing field '{}' in {}", field, value)))
}

fn u64_field(value: &Value, field: &str) -> Result<u64> {
    value
        .get(field)
        .and_then(json_u64)
        .ok_or_else(|| OpsError::SuiClient(format!("Missing numeric field '{}' in {}", field, value)))
}

/// 解析 `sui_getObject` 的 result
fn parse_object_response(id: &ObjectId, result: &Value) -> Result<ObjectInfo> {
    let data = match result.get("data") {
        Some(data) if !data.is_null() => data,
        _ => {
            let reason = result
                .get("error")
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no data".to_string());
            return Err(OpsError::ObjectNotFound(format!("{} ({})", id, reason)));
        }
    };

    let object_ref = ObjectRef {
        object_id: str_field(data, "objectId")?.parse()?,
        version: u64_field(data, "version")?,
        digest: str_field(data, "digest")?.parse()?,
    };

    let owner = data
        .get("owner")
        .ok_or_else(|| OpsError::SuiClient(format!("Object {} has no owner field", id)))
        .and_then(Owner::from_json)?;

    Ok(ObjectInfo {
        object_ref,
        owner,
        object_type: data.get("type").and_then(|t| t.as_str()).map(str::to_string),
    })
}

/// `suix_getCoins` 的一頁結果
#[derive(Debug)]
struct CoinPage {
    coins: Vec<GasCoin>,
    /// 還有下一頁時的游標
    next_cursor: Option<Value>,
}

/// 解析 `suix_getCoins` 的 result
fn parse_coins_response(result: &Value) -> Result<CoinPage> {
    let data = result
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| OpsError::SuiClient("Coin page has no data array".to_string()))?;

    let has_next = result
        .get("hasNextPage")
        .and_then(|h| h.as_bool())
        .unwrap_or(false);
    let next_cursor = match result.get("nextCursor") {
        Some(cursor) if has_next && !cursor.is_null() => Some(cursor.clone()),
        _ => None,
    };

    let coins = data
        .iter()
        .map(|coin| -> Result<GasCoin> {
            Ok(GasCoin {
                object_ref: ObjectRef {
                    object_id: str_field(coin, "coinObjectId")?.parse()?,
                    version: u64_field(coin, "version")?,
                    digest: str_field(coin, "digest")?.parse()?,
                },
                balance: u64_field(coin, "balance")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CoinPage { coins, next_cursor })
}

#[async_trait]
impl LedgerClient for JsonRpcLedgerClient {
    async fn get_balance(&self, owner: &SuiAddress) -> Result<u128> {
        let result = self
            .read("suix_getBalance", json!([owner.to_string(), SUI_COIN_TYPE]))
            .await?;

        let total = str_field(&result, "totalBalance")?;
        total
            .parse()
            .map_err(|e| OpsError::SuiClient(format!("Invalid balance '{}': {}", total, e)))
    }

    async fn get_object(&self, id: &ObjectId) -> Result<ObjectInfo> {
        let result = self
            .read(
                "sui_getObject",
                json!([id.to_string(), { "showOwner": true, "showType": true }]),
            )
            .await?;

        parse_object_response(id, &result)
    }

    async fn get_gas_coins(&self, owner: &SuiAddress) -> Result<Vec<GasCoin>> {
        let mut coins = Vec::new();
        let mut cursor = Value::Null;

        for page in 1..=MAX_GAS_COIN_PAGES {
            let result = self
                .read(
                    "suix_getCoins",
                    json!([owner.to_string(), SUI_COIN_TYPE, cursor, GAS_COIN_PAGE_SIZE]),
                )
                .await?;

            let CoinPage { coins: batch, next_cursor } = parse_coins_response(&result)?;
            debug!(page, count = batch.len(), "Fetched gas coin page");
            coins.extend(batch);

            match next_cursor {
                Some(next) => cursor = next,
                None => return Ok(coins),
            }
        }

        warn!(
            "Owner {} has more than {} pages of SUI coins; using the first {}",
            owner,
            MAX_GAS_COIN_PAGES,
            coins.len()
        );
        Ok(coins)
    }

    async fn reference_gas_price(&self) -> Result<u64> {
        let result = self.read("suix_getReferenceGasPrice", json!([])).await?;
        json_u64(&result)
            .ok_or_else(|| OpsError::SuiClient(format!("Invalid reference gas price: {}", result)))
    }

    async fn execute_transaction(&self, tx: &SignedTransaction) -> Result<ExecutionOutcome> {
        let result = self
            .call(
                "sui_executeTransactionBlock",
                json!([
                    tx.tx_bytes,
                    tx.signatures,
                    {
                        "showInput": true,
                        "showEffects": true,
                        "showEvents": true,
                        "showObjectChanges": true
                    },
                    "WaitForLocalExecution"
                ]),
            )
            .await?;

        ExecutionOutcome::from_response(result)
    }
}
