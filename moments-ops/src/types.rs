//! 共享數據類型定義
//!
//! 本模塊定義各個子系統共享的數據結構：鏈上標識符、對象引用、
//! 帳本返回的對象變更記錄以及運行時配置

use crate::error::{OpsError, Result};
use crate::transaction::TypeTag;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// 32 字節十六進制標識符（0x 前綴，短格式左側補零）
fn parse_hex_32(s: &str) -> Result<[u8; 32]> {
    let trimmed = s.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex_part.is_empty() || hex_part.len() > 64 {
        return Err(OpsError::InvalidObjectId(format!(
            "expected 1-64 hex digits, got '{}'",
            s
        )));
    }

    let padded = format!("{:0>64}", hex_part);
    let bytes = hex::decode(&padded)
        .map_err(|e| OpsError::InvalidObjectId(format!("'{}': {}", s, e)))?;

    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

macro_rules! address_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const LENGTH: usize = 32;

            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = OpsError;

            fn from_str(s: &str) -> Result<Self> {
                parse_hex_32(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        // BCS 中為定長 32 字節，JSON 中為十六進制字符串
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_string())
                } else {
                    self.0.serialize(serializer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(serde::de::Error::custom)
                } else {
                    <[u8; 32]>::deserialize(deserializer).map(Self)
                }
            }
        }
    };
}

address_type!(
    /// Sui 對象 ID
    ObjectId
);

address_type!(
    /// Sui 帳戶地址
    SuiAddress
);

impl ObjectId {
    /// 系統時鐘共享對象 (0x6)
    pub const CLOCK: ObjectId = ObjectId(clock_bytes());
}

const fn clock_bytes() -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[31] = 0x06;
    bytes
}

/// 對象摘要（RPC 中為 base58）
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectDigest([u8; 32]);

impl ObjectDigest {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for ObjectDigest {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s.trim())
            .into_vec()
            .map_err(|e| OpsError::SuiClient(format!("Invalid object digest '{}': {}", s, e)))?;

        let bytes: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            OpsError::SuiClient(format!(
                "Invalid object digest length: expected 32 bytes, got {}",
                v.len()
            ))
        })?;

        Ok(Self(bytes))
    }
}

impl fmt::Display for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectDigest({})", self)
    }
}

// BCS 中為帶長度前綴的字節向量
impl Serialize for ObjectDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

/// 對象引用 (ID, 版本, 摘要)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectRef {
    pub object_id: ObjectId,
    pub version: u64,
    pub digest: ObjectDigest,
}

/// 對象所有權
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    AddressOwner(SuiAddress),
    ObjectOwner(ObjectId),
    Shared { initial_shared_version: u64 },
    Immutable,
    /// 共識排序的地址所有對象，交易中按共享對象引用
    ConsensusAddressOwner { start_version: u64, owner: SuiAddress },
}

impl Owner {
    /// 解析 RPC 的 owner 字段
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        if value.as_str() == Some("Immutable") {
            return Ok(Owner::Immutable);
        }

        if let Some(address) = value.get("AddressOwner").and_then(|v| v.as_str()) {
            return Ok(Owner::AddressOwner(address.parse()?));
        }

        if let Some(parent) = value.get("ObjectOwner").and_then(|v| v.as_str()) {
            return Ok(Owner::ObjectOwner(parent.parse()?));
        }

        if let Some(shared) = value.get("Shared") {
            let version = shared
                .get("initial_shared_version")
                .and_then(json_u64)
                .ok_or_else(|| {
                    OpsError::SuiClient(format!("Shared owner missing initial version: {}", value))
                })?;
            return Ok(Owner::Shared {
                initial_shared_version: version,
            });
        }

        if let Some(consensus) = value.get("ConsensusAddressOwner") {
            let start_version = consensus
                .get("start_version")
                .and_then(json_u64)
                .ok_or_else(|| {
                    OpsError::SuiClient(format!("Consensus owner missing start version: {}", value))
                })?;
            let owner = consensus
                .get("owner")
                .and_then(|o| o.as_str())
                .ok_or_else(|| {
                    OpsError::SuiClient(format!("Consensus owner missing address: {}", value))
                })?
                .parse()?;
            return Ok(Owner::ConsensusAddressOwner {
                start_version,
                owner,
            });
        }

        Err(OpsError::SuiClient(format!("Unsupported owner: {}", value)))
    }
}

/// 數值字段可能以字符串或數字出現
pub(crate) fn json_u64(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::String(s) => s.parse().ok(),
        serde_json::Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// 鏈上對象摘要信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub object_ref: ObjectRef,
    pub owner: Owner,
    pub object_type: Option<String>,
}

/// 可用作 gas 的 SUI 幣對象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasCoin {
    pub object_ref: ObjectRef,
    pub balance: u64,
}

/// 帳本返回的對象變更記錄
///
/// 原樣透傳，不做重新解釋；節點新增的變更類型落入 [`ObjectChange::Unknown`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ObjectChange {
    #[serde(rename_all = "camelCase")]
    Published {
        package_id: String,
        #[serde(default)]
        version: String,
        #[serde(default)]
        modules: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Transferred {
        #[serde(default)]
        sender: String,
        #[serde(default)]
        recipient: serde_json::Value,
        object_type: String,
        object_id: String,
        #[serde(default)]
        version: String,
    },
    #[serde(rename_all = "camelCase")]
    Mutated {
        #[serde(default)]
        sender: String,
        #[serde(default)]
        owner: serde_json::Value,
        object_type: String,
        object_id: String,
        #[serde(default)]
        version: String,
        #[serde(default)]
        previous_version: String,
    },
    #[serde(rename_all = "camelCase")]
    Deleted {
        #[serde(default)]
        sender: String,
        object_type: String,
        object_id: String,
        #[serde(default)]
        version: String,
    },
    #[serde(rename_all = "camelCase")]
    Wrapped {
        #[serde(default)]
        sender: String,
        object_type: String,
        object_id: String,
        #[serde(default)]
        version: String,
    },
    #[serde(rename_all = "camelCase")]
    Created {
        #[serde(default)]
        sender: String,
        #[serde(default)]
        owner: serde_json::Value,
        object_type: String,
        object_id: String,
        #[serde(default)]
        version: String,
    },
    #[serde(other)]
    Unknown,
}

impl ObjectChange {
    /// 逐條解碼，無法識別的條目記為 `Unknown`
    fn from_json_lenient(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!("Unrecognized object change {}: {}", value, e);
            ObjectChange::Unknown
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ObjectChange::Published { .. } => "published",
            ObjectChange::Transferred { .. } => "transferred",
            ObjectChange::Mutated { .. } => "mutated",
            ObjectChange::Deleted { .. } => "deleted",
            ObjectChange::Wrapped { .. } => "wrapped",
            ObjectChange::Created { .. } => "created",
            ObjectChange::Unknown => "unknown",
        }
    }

    pub fn object_id(&self) -> Option<&str> {
        match self {
            ObjectChange::Published { package_id, .. } => Some(package_id),
            ObjectChange::Transferred { object_id, .. }
            | ObjectChange::Mutated { object_id, .. }
            | ObjectChange::Deleted { object_id, .. }
            | ObjectChange::Wrapped { object_id, .. }
            | ObjectChange::Created { object_id, .. } => Some(object_id),
            ObjectChange::Unknown => None,
        }
    }

    pub fn object_type(&self) -> Option<&str> {
        match self {
            ObjectChange::Published { .. } | ObjectChange::Unknown => None,
            ObjectChange::Transferred { object_type, .. }
            | ObjectChange::Mutated { object_type, .. }
            | ObjectChange::Deleted { object_type, .. }
            | ObjectChange::Wrapped { object_type, .. }
            | ObjectChange::Created { object_type, .. } => Some(object_type),
        }
    }

    /// 對象 ID 是否等於 `id`（忽略大小寫與補零差異）
    pub fn refers_to(&self, id: &ObjectId) -> bool {
        self.object_id()
            .and_then(|s| s.parse::<ObjectId>().ok())
            .map_or(false, |parsed| parsed == *id)
    }
}

/// 交易執行狀態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failure { error: String },
}

/// 交易執行結果
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    /// 交易摘要
    pub digest: String,

    /// 執行狀態
    pub status: ExecutionStatus,

    /// 對象變更
    pub object_changes: Vec<ObjectChange>,

    /// 原始響應
    pub raw: serde_json::Value,
}

impl ExecutionOutcome {
    /// 從 `sui_executeTransactionBlock` 響應解析
    pub fn from_response(raw: serde_json::Value) -> Result<Self> {
        let digest = raw
            .get("digest")
            .and_then(|d| d.as_str())
            .ok_or_else(|| OpsError::SuiClient("Response missing transaction digest".to_string()))?
            .to_string();

        let status = match raw.pointer("/effects/status/status").and_then(|s| s.as_str()) {
            Some("success") => ExecutionStatus::Success,
            Some(_) => ExecutionStatus::Failure {
                error: raw
                    .pointer("/effects/status/error")
                    .and_then(|e| e.as_str())
                    .unwrap_or("unknown error")
                    .to_string(),
            },
            None => {
                return Err(OpsError::SuiClient(
                    "Response missing effects status".to_string(),
                ))
            }
        };

        let object_changes = raw
            .get("objectChanges")
            .and_then(|changes| changes.as_array())
            .map(|changes| changes.iter().map(ObjectChange::from_json_lenient).collect())
            .unwrap_or_default();

        Ok(Self {
            digest,
            status,
            object_changes,
            raw,
        })
    }

    /// 第一個類型包含 `type_fragment` 的新建對象
    pub fn find_created(&self, type_fragment: &str) -> Option<&ObjectChange> {
        self.object_changes.iter().find(|change| {
            matches!(change, ObjectChange::Created { object_type, .. } if object_type.contains(type_fragment))
        })
    }

    /// 類型完全等於 `object_type` 的新建對象
    ///
    /// 按解析後的類型標籤比較，地址的短格式與完整格式視為相同
    pub fn find_created_exact(&self, object_type: &TypeTag) -> Option<&ObjectChange> {
        self.object_changes.iter().find(|change| match change {
            ObjectChange::Created { object_type: t, .. } => {
                t.parse::<TypeTag>().map_or(false, |parsed| parsed == *object_type)
            }
            _ => false,
        })
    }

    /// 被修改的指定對象
    pub fn find_mutated(&self, id: &ObjectId) -> Option<&ObjectChange> {
        self.object_changes
            .iter()
            .find(|change| matches!(change, ObjectChange::Mutated { .. }) && change.refers_to(id))
    }
}

/// 配置結構（將在 config.rs 中使用）
///
/// 操作工具運行時配置；缺省字段取自環境變量
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpsConfig {
    /// Sui RPC 端點或網絡別名（mainnet/testnet/devnet/localnet）
    pub sui_rpc_url: String,

    /// 助記詞（可選）
    pub mnemonic: Option<String>,

    /// Base64 私鑰（可選）
    pub secret_key: Option<String>,

    /// Base64 私鑰文件路徑（可選）
    pub secret_key_path: Option<String>,

    /// Sui CLI keystore 文件路徑（可選）
    pub sui_keystore_path: Option<String>,

    /// moments 合約 Package ID
    pub package_id: Option<String>,

    /// Publisher 對象 ID（創建 Display 時需要）
    pub publisher_id: Option<String>,

    /// AdminCap 對象 ID
    pub admin_cap_id: Option<String>,

    /// SOUV 類型名（moments 模塊內的見證類型）
    pub souv_type: String,

    /// 合約調用 gas budget（MIST）
    pub gas_budget: u64,

    /// 創建 Display 的 gas budget（MIST）
    pub display_gas_budget: u64,

    /// HTTP 請求超時（秒）
    pub http_timeout_secs: u64,

    /// 只讀 RPC 最大重試次數
    pub rpc_max_retries: u32,

    /// Display 字段覆蓋（鍵 → 值）
    pub display_fields: HashMap<String, String>,
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            sui_rpc_url: std::env::var("SUI_NETWORK").unwrap_or_else(|_| "testnet".to_string()),
            mnemonic: std::env::var("MNEMONIC").ok(),
            secret_key: std::env::var("SECRET_KEY").ok(),
            secret_key_path: std::env::var("SECRET_KEY_PATH").ok(),
            sui_keystore_path: std::env::var("SUI_KEYSTORE_PATH").ok(),
            package_id: std::env::var("PACKAGE_ID").ok(),
            publisher_id: std::env::var("PUBLISHER_ID").ok(),
            admin_cap_id: std::env::var("ADMIN_CAP_ID").ok(),
            souv_type: std::env::var("SOUV_TYPE").unwrap_or_else(|_| "SOUV1".to_string()),
            gas_budget: std::env::var("GAS_BUDGET")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_000_000),
            display_gas_budget: std::env::var("DISPLAY_GAS_BUDGET")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50_000_000),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            rpc_max_retries: std::env::var("RPC_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            display_fields: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_short_form() {
        let clock: ObjectId = "0x6".parse().unwrap();
        assert_eq!(clock, ObjectId::CLOCK);
        assert_eq!(
            clock.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000006"
        );
    }

    #[test]
    fn test_object_id_full_form() {
        let s = "0x3e6297ed667f8a70b73bce1110d4062d483a7e07f5c1d3d2a7ba864af2f1bb72";
        let id: ObjectId = s.parse().unwrap();
        assert_eq!(id.to_string(), s);

        let upper: ObjectId = s.to_uppercase().replacen("0X", "0x", 1).parse().unwrap();
        assert_eq!(upper, id);
    }

    #[test]
    fn test_object_id_rejects_garbage() {
        assert!("0x".parse::<ObjectId>().is_err());
        assert!("0xzz".parse::<ObjectId>().is_err());
        assert!(format!("0x{}", "1".repeat(65)).parse::<ObjectId>().is_err());
    }

    #[test]
    fn test_object_id_serialization() {
        let id: ObjectId = "0x2".parse().unwrap();

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let bcs_bytes = bcs::to_bytes(&id).unwrap();
        assert_eq!(bcs_bytes.len(), 32);
        assert_eq!(bcs_bytes[31], 2);
    }

    #[test]
    fn test_digest_bcs_has_length_prefix() {
        let digest = ObjectDigest::new([9u8; 32]);
        let bytes = bcs::to_bytes(&digest).unwrap();

        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 32);

        let parsed: ObjectDigest = digest.to_string().parse().unwrap();
        assert_eq!(parsed, digest);
    }

    #[test]
    fn test_outcome_parsing() {
        let raw = serde_json::json!({
            "digest": "9Xx",
            "effects": { "status": { "status": "success" } },
            "objectChanges": [
                {
                    "type": "created",
                    "sender": "0x1",
                    "owner": { "AddressOwner": "0x1" },
                    "objectType": "0xabc::moments::Event<0xabc::moments::SOUV1>",
                    "objectId": "0x00000000000000000000000000000000000000000000000000000000000000aa",
                    "version": "5",
                    "digest": "x"
                },
                {
                    "type": "mutated",
                    "sender": "0x1",
                    "owner": { "AddressOwner": "0x1" },
                    "objectType": "0x2::coin::Coin<0x2::sui::SUI>",
                    "objectId": "0xbb",
                    "version": "5",
                    "previousVersion": "4",
                    "digest": "y"
                }
            ]
        });

        let outcome = ExecutionOutcome::from_response(raw).unwrap();
        assert_eq!(outcome.status, ExecutionStatus::Success);
        assert_eq!(outcome.object_changes.len(), 2);

        let created = outcome.find_created("::moments::Event").unwrap();
        assert_eq!(created.kind(), "created");
        assert!(created.refers_to(&"0xaa".parse().unwrap()));

        assert!(outcome.find_mutated(&"0xbb".parse().unwrap()).is_some());
        assert!(outcome.find_mutated(&"0xaa".parse().unwrap()).is_none());
    }

    #[test]
    fn test_owner_parsing() {
        let shared = serde_json::json!({ "Shared": { "initial_shared_version": 1 } });
        assert_eq!(
            Owner::from_json(&shared).unwrap(),
            Owner::Shared {
                initial_shared_version: 1
            }
        );

        let owned = serde_json::json!({ "AddressOwner": "0x5" });
        assert!(matches!(Owner::from_json(&owned).unwrap(), Owner::AddressOwner(_)));

        assert_eq!(
            Owner::from_json(&serde_json::json!("Immutable")).unwrap(),
            Owner::Immutable
        );
        assert!(Owner::from_json(&serde_json::json!({ "Unknown": 1 })).is_err());
    }

    #[test]
    fn test_consensus_address_owner_parsing() {
        let value = serde_json::json!({
            "ConsensusAddressOwner": {
                "start_version": 5,
                "owner": "0x0000000000000000000000000000000000000000000000000000000000000007"
            }
        });

        assert_eq!(
            Owner::from_json(&value).unwrap(),
            Owner::ConsensusAddressOwner {
                start_version: 5,
                owner: "0x7".parse().unwrap(),
            }
        );

        // 版本以字符串出現
        let stringly = serde_json::json!({
            "ConsensusAddressOwner": { "start_version": "9", "owner": "0x7" }
        });
        assert!(matches!(
            Owner::from_json(&stringly).unwrap(),
            Owner::ConsensusAddressOwner { start_version: 9, .. }
        ));

        let missing = serde_json::json!({ "ConsensusAddressOwner": { "owner": "0x7" } });
        assert!(Owner::from_json(&missing).is_err());
    }

    #[test]
    fn test_unknown_object_change_kept_as_unknown() {
        let raw = serde_json::json!({
            "digest": "5Yx",
            "effects": { "status": { "status": "success" } },
            "objectChanges": [
                { "type": "unwrappedThenDeleted", "objectId": "0x1", "version": "3" },
                { "type": "created", "objectId": "0x2" },
                {
                    "type": "created",
                    "objectType": "0xabc::moments::Event<0xabc::moments::SOUV1>",
                    "objectId": "0xcc"
                }
            ]
        });

        let outcome = ExecutionOutcome::from_response(raw).unwrap();
        assert_eq!(outcome.digest, "5Yx");
        assert_eq!(outcome.object_changes.len(), 3);
        assert_eq!(outcome.object_changes[0], ObjectChange::Unknown);
        // 已知類型但缺少必需字段
        assert_eq!(outcome.object_changes[1].kind(), "unknown");
        assert!(outcome.object_changes[1].object_id().is_none());

        let created = outcome.find_created("::moments::Event").unwrap();
        assert!(created.refers_to(&"0xcc".parse().unwrap()));
    }

    #[test]
    fn test_find_created_exact_ignores_address_padding() {
        let raw = serde_json::json!({
            "digest": "d",
            "effects": { "status": { "status": "success" } },
            "objectChanges": [{
                "type": "created",
                "objectType": "0x2::display::Display<0xabc::moments::Platform<0xabc::moments::SOUV1>>",
                "objectId": "0x1"
            }]
        });
        let outcome = ExecutionOutcome::from_response(raw).unwrap();

        let wanted: TypeTag = format!(
            "0x0000000000000000000000000000000000000000000000000000000000000002::display::Display<{}::moments::Platform<{}::moments::SOUV1>>",
            "0x0abc", "0xabc"
        )
        .parse()
        .unwrap();
        assert!(outcome.find_created_exact(&wanted).is_some());

        let other: TypeTag = "0x2::display::Display<0xabc::moments::SOUV1>".parse().unwrap();
        assert!(outcome.find_created_exact(&other).is_none());
    }

    #[test]
    fn test_outcome_failure_status() {
        let raw = serde_json::json!({
            "digest": "abc",
            "effects": { "status": { "status": "failure", "error": "MoveAbort(..., 3)" } }
        });

        let outcome = ExecutionOutcome::from_response(raw).unwrap();
        assert_eq!(
            outcome.status,
            ExecutionStatus::Failure {
                error: "MoveAbort(..., 3)".to_string()
            }
        );
        assert!(outcome.object_changes.is_empty());
    }
}
