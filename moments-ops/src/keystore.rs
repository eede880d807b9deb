//! 操作員身份加載與持久化模塊
//!
//! # 身份來源
//!
//! 按以下優先級從配置中選擇一個來源，經 [`KeyProvider`] 解析為 Ed25519 密鑰對：
//!
//! 1. `secret_key`：Base64 私鑰
//! 2. `secret_key_path`：包含 Base64 私鑰的文件
//! 3. `mnemonic`：BIP-39 助記詞（Sui 派生路徑）
//! 4. `sui_keystore_path`：Sui CLI keystore（`default` 表示 `~/.sui/sui_config/sui.keystore`）
//! 5. 以上皆無：隨機生成（僅用於演示，會打印警告）
//!
//! ## 文件權限（Unix/Linux）
//!
//! - 新生成的私鑰文件設置為 `0o600`
//! - 加載時若權限寬於 `0o600` 會打印警告
//!
//! ⚠️ 私鑰以**未加密**形式存儲，依賴操作系統文件權限保護。
//!
//! # 使用示例
//!
//! ```no_run
//! use moments_ops::keystore::load_identity;
//! use moments_ops::types::OpsConfig;
//! use moments_signer::KeyProvider;
//!
//! let provider = KeyProvider::new();
//! let keypair = load_identity(&provider, &OpsConfig::default())?;
//! println!("pk = {}", hex::encode(keypair.public_key_bytes()));
//! # Ok::<(), moments_ops::error::OpsError>(())
//! ```

use crate::error::{OpsError, Result};
use crate::transaction::{sui_address, ED25519_FLAG};
use crate::types::{OpsConfig, SuiAddress};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use moments_signer::{Ed25519Keypair, KeyProvider, KeySource};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 身份來源（用於日誌）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOrigin {
    SecretKey,
    SecretKeyFile(PathBuf),
    Mnemonic,
    SuiKeystore(PathBuf),
    Random,
}

impl fmt::Display for KeyOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyOrigin::SecretKey => write!(f, "secret key"),
            KeyOrigin::SecretKeyFile(path) => write!(f, "secret key file {:?}", path),
            KeyOrigin::Mnemonic => write!(f, "mnemonic"),
            KeyOrigin::SuiKeystore(path) => write!(f, "Sui keystore {:?}", path),
            KeyOrigin::Random => write!(f, "random keypair"),
        }
    }
}

/// Sui CLI keystore 默認路徑：~/.sui/sui_config/sui.keystore
pub fn default_sui_keystore_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| OpsError::Keystore("Cannot find home directory".to_string()))?;

    Ok(home.join(".sui").join("sui_config").join("sui.keystore"))
}

/// 根據配置選擇身份來源
pub fn key_source_from_config(config: &OpsConfig) -> Result<(KeySource, KeyOrigin)> {
    if let Some(secret) = config.secret_key.as_deref().filter(|s| !s.trim().is_empty()) {
        return Ok((KeySource::SecretKey(secret.trim().to_string()), KeyOrigin::SecretKey));
    }

    if let Some(path) = config.secret_key_path.as_deref() {
        let path = PathBuf::from(path);
        let secret = read_secret_key_file(&path)?;
        return Ok((KeySource::SecretKey(secret), KeyOrigin::SecretKeyFile(path)));
    }

    if let Some(phrase) = config.mnemonic.as_deref().filter(|s| !s.trim().is_empty()) {
        return Ok((KeySource::Mnemonic(phrase.to_string()), KeyOrigin::Mnemonic));
    }

    if let Some(path) = config.sui_keystore_path.as_deref() {
        let path = if path == "default" {
            default_sui_keystore_path()?
        } else {
            PathBuf::from(path)
        };
        let secret = read_sui_keystore(&path)?;
        return Ok((KeySource::SecretKey(secret), KeyOrigin::SuiKeystore(path)));
    }

    Ok((KeySource::Random, KeyOrigin::Random))
}

/// 解析並緩存操作員身份
pub fn load_identity<'a>(provider: &'a KeyProvider, config: &OpsConfig) -> Result<&'a Ed25519Keypair> {
    if let Some(keypair) = provider.keypair() {
        return Ok(keypair);
    }

    let (source, origin) = key_source_from_config(config)?;
    if origin == KeyOrigin::Random {
        warn!("No key configured (SECRET_KEY, SECRET_KEY_PATH, MNEMONIC or SUI_KEYSTORE_PATH); using a random keypair");
    }

    let keypair = provider
        .derive_or_load(&source)
        .map_err(|e| OpsError::Keystore(format!("Failed to load key from {}: {}", origin, e)))?;

    info!(
        "Operator identity loaded from {}: address {}",
        origin,
        address_of(keypair)
    );

    Ok(keypair)
}

/// 密鑰對的 Sui 地址
pub fn address_of(keypair: &Ed25519Keypair) -> SuiAddress {
    sui_address(&keypair.public_key_bytes())
}

/// 讀取 Base64 私鑰文件
pub fn read_secret_key_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(OpsError::Keystore(format!(
            "Secret key file not found: {:?}",
            path
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        OpsError::Keystore(format!("Failed to read secret key from {:?}: {}", path, e))
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mode = fs::metadata(path)?.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            warn!(
                "WARNING: Secret key file has insecure permissions: {:o} (should be 0o600)",
                mode
            );
            warn!("Run: chmod 600 {:?}", path);
        }
    }

    let secret = contents.trim();
    if secret.is_empty() {
        return Err(OpsError::Keystore(format!("Secret key file {:?} is empty", path)));
    }

    Ok(secret.to_string())
}

/// 從 Sui CLI keystore 取第一個 Ed25519 私鑰（Base64，不含方案標誌）
///
/// keystore 為 JSON 字符串數組，每項為 `base64(flag || secret)`
pub fn read_sui_keystore(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(OpsError::Keystore(format!(
            "Keystore file not found at {:?}. Please run 'sui client' to initialize.",
            path
        )));
    }

    let contents = fs::read_to_string(path)?;
    let entries: Vec<String> = serde_json::from_str(&contents).map_err(|e| {
        OpsError::Keystore(format!("Failed to parse keystore {:?}: {}", path, e))
    })?;

    info!("Loaded Sui keystore from {:?} ({} key(s))", path, entries.len());

    for entry in &entries {
        let bytes = match STANDARD.decode(entry.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping undecodable keystore entry: {}", e);
                continue;
            }
        };

        match bytes.split_first() {
            Some((&ED25519_FLAG, secret)) if secret.len() == 32 => {
                return Ok(STANDARD.encode(secret));
            }
            Some((flag, _)) => {
                info!("Skipping keystore entry with scheme flag {:#04x}", flag);
            }
            None => {}
        }
    }

    Err(OpsError::Keystore(format!(
        "No Ed25519 key found in keystore {:?}",
        path
    )))
}

/// 生成新密鑰對並保存為 Base64 私鑰文件
///
/// 已存在的文件不會被覆蓋。
///
/// # 安全警告
///
/// ⚠️ 私鑰以**明文**形式存儲！
pub fn generate_and_save(path: &Path) -> Result<Ed25519Keypair> {
    if path.exists() {
        return Err(OpsError::Keystore(format!(
            "Refusing to overwrite existing key file {:?}",
            path
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            OpsError::Keystore(format!("Failed to create directory {:?}: {}", parent, e))
        })?;
    }

    let keypair = Ed25519Keypair::generate();

    fs::write(path, keypair.export_secret_base64()).map_err(|e| {
        OpsError::Keystore(format!("Failed to write secret key to {:?}: {}", path, e))
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms).map_err(|e| {
            OpsError::Keystore(format!("Failed to set secret key permissions: {}", e))
        })?;

        info!("Secret key permissions set to 0o600 (owner read/write only)");
    }

    #[cfg(not(unix))]
    {
        warn!("File permissions not set (non-Unix system). Ensure private key security manually!");
    }

    info!(
        "New key saved to {:?}: address {}",
        path,
        address_of(&keypair)
    );

    Ok(keypair)
}
