//! Sui 可編程交易 (PTB) 的 BCS 模型
//!
//! 只覆蓋 moments 合約調用所需的子集：
//! - `MoveCall` 與 `TransferObjects` 兩種命令
//! - Pure / Object 兩種輸入
//! - Ed25519 簽名（Intent 前綴 + Blake2b256 摘要）
//!
//! 枚舉變體的聲明順序即 BCS 判別值，不能調整。

use crate::error::{OpsError, Result};
use crate::types::{ObjectId, ObjectRef, SuiAddress};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use fastcrypto::hash::{Blake2b256, HashFunction};
use moments_signer::Signer;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Ed25519 簽名方案標誌
pub const ED25519_FLAG: u8 = 0x00;

/// 唯一支持的簽名算法
const ED25519_ALGORITHM: &str = "Ed25519";

/// TransactionData 的 Intent 前綴：scope=0, version=0, app_id=Sui
pub const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

/// 交易摘要的類型名前綴
const TRANSACTION_DIGEST_PREFIX: &[u8] = b"TransactionData::";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: SuiAddress,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: SuiAddress,
    pub price: u64,
    pub budget: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionExpiration {
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CallArg {
    Pure(Vec<u8>),
    Object(ObjectArg),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ObjectArg {
    ImmOrOwnedObject(ObjectRef),
    SharedObject {
        id: ObjectId,
        initial_shared_version: u64,
        mutable: bool,
    },
}

impl ObjectArg {
    pub fn id(&self) -> ObjectId {
        match self {
            ObjectArg::ImmOrOwnedObject(r) => r.object_id,
            ObjectArg::SharedObject { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    TransferObjects(Vec<Argument>, Argument),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgrammableMoveCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
}

/// Move 類型標籤
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StructTag {
    pub address: ObjectId,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

impl StructTag {
    pub fn new(address: ObjectId, module: &str, name: &str, type_params: Vec<TypeTag>) -> Self {
        Self {
            address,
            module: module.to_string(),
            name: name.to_string(),
            type_params,
        }
    }
}

impl From<StructTag> for TypeTag {
    fn from(tag: StructTag) -> Self {
        TypeTag::Struct(Box::new(tag))
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if !self.type_params.is_empty() {
            let params: Vec<String> = self.type_params.iter().map(|t| t.to_string()).collect();
            write!(f, "<{}>", params.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Signer => write!(f, "signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{}>", inner),
            TypeTag::Struct(tag) => write!(f, "{}", tag),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// 按頂層逗號切分類型參數列表
fn split_type_params(s: &str) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
        if depth < 0 {
            return Err(OpsError::Config(format!("Unbalanced type parameters: '{}'", s)));
        }
    }

    if depth != 0 {
        return Err(OpsError::Config(format!("Unbalanced type parameters: '{}'", s)));
    }
    parts.push(s[start..].trim());
    Ok(parts)
}

impl FromStr for StructTag {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (head, type_params) = match s.find('<') {
            Some(open) => {
                let inner = s[open + 1..]
                    .strip_suffix('>')
                    .ok_or_else(|| OpsError::Config(format!("Invalid struct type: '{}'", s)))?;
                let params = split_type_params(inner)?
                    .into_iter()
                    .map(TypeTag::from_str)
                    .collect::<Result<Vec<_>>>()?;
                (&s[..open], params)
            }
            None => (s, Vec::new()),
        };

        let segments: Vec<&str> = head.split("::").collect();
        if segments.len() != 3 || !is_identifier(segments[1]) || !is_identifier(segments[2]) {
            return Err(OpsError::Config(format!(
                "Invalid struct type '{}': expected <address>::<module>::<name>",
                s
            )));
        }

        Ok(StructTag {
            address: segments[0].parse()?,
            module: segments[1].to_string(),
            name: segments[2].to_string(),
            type_params,
        })
    }
}

impl FromStr for TypeTag {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let tag = match s {
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::U8,
            "u64" => TypeTag::U64,
            "u128" => TypeTag::U128,
            "address" => TypeTag::Address,
            "signer" => TypeTag::Signer,
            _ => {
                if let Some(inner) = s.strip_prefix("vector<").and_then(|r| r.strip_suffix('>')) {
                    TypeTag::Vector(Box::new(inner.parse()?))
                } else {
                    TypeTag::Struct(Box::new(s.parse()?))
                }
            }
        };
        Ok(tag)
    }
}

/// 可編程交易構造器
///
/// 對象輸入按 ID 去重；純值輸入每次追加
#[derive(Debug, Default)]
pub struct ProgrammableTransactionBuilder {
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
}

impl ProgrammableTransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加 BCS 編碼的純值輸入
    pub fn pure<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<Argument> {
        let bytes = bcs::to_bytes(value)?;
        Ok(self.pure_bytes(bytes))
    }

    /// 追加已編碼的純值輸入
    pub fn pure_bytes(&mut self, bytes: Vec<u8>) -> Argument {
        self.push_input(CallArg::Pure(bytes))
    }

    /// 追加對象輸入；同一對象只出現一次
    pub fn obj(&mut self, arg: ObjectArg) -> Result<Argument> {
        let id = arg.id();
        let existing = self.inputs.iter().position(|input| match input {
            CallArg::Object(o) => o.id() == id,
            CallArg::Pure(_) => false,
        });

        match existing {
            Some(index) => {
                let slot = &mut self.inputs[index];
                match (slot, arg) {
                    (
                        CallArg::Object(ObjectArg::SharedObject { mutable, .. }),
                        ObjectArg::SharedObject { mutable: wanted, .. },
                    ) => {
                        *mutable |= wanted;
                    }
                    (CallArg::Object(current), incoming) if *current != incoming => {
                        return Err(OpsError::SuiClient(format!(
                            "Conflicting inputs for object {}",
                            id
                        )));
                    }
                    _ => {}
                }
                Ok(Argument::Input(index as u16))
            }
            None => Ok(self.push_input(CallArg::Object(arg))),
        }
    }

    fn push_input(&mut self, arg: CallArg) -> Argument {
        self.inputs.push(arg);
        Argument::Input((self.inputs.len() - 1) as u16)
    }

    pub fn command(&mut self, command: Command) -> Argument {
        self.push_command(command)
    }

    fn push_command(&mut self, command: Command) -> Argument {
        self.commands.push(command);
        Argument::Result((self.commands.len() - 1) as u16)
    }

    pub fn move_call(
        &mut self,
        package: ObjectId,
        module: &str,
        function: &str,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> Argument {
        self.push_command(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module: module.to_string(),
            function: function.to_string(),
            type_arguments,
            arguments,
        })))
    }

    pub fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: Argument) -> Argument {
        self.push_command(Command::TransferObjects(objects, recipient))
    }

    pub fn finish(self) -> ProgrammableTransaction {
        ProgrammableTransaction {
            inputs: self.inputs,
            commands: self.commands,
        }
    }
}

impl TransactionData {
    pub fn new_programmable(
        sender: SuiAddress,
        payment: Vec<ObjectRef>,
        pt: ProgrammableTransaction,
        budget: u64,
        price: u64,
    ) -> Self {
        TransactionData::V1(TransactionDataV1 {
            kind: TransactionKind::ProgrammableTransaction(pt),
            sender,
            gas_data: GasData {
                payment,
                owner: sender,
                price,
                budget,
            },
            expiration: TransactionExpiration::None,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    /// 簽名用摘要：`Blake2b256(intent || bcs(tx))`
    pub fn signing_digest(&self) -> Result<[u8; 32]> {
        let mut hasher = Blake2b256::default();
        hasher.update(TRANSACTION_INTENT);
        hasher.update(self.to_bytes()?);
        Ok(hasher.finalize().digest)
    }

    /// 交易摘要：`Blake2b256("TransactionData::" || bcs(tx))`，base58 編碼
    ///
    /// 與節點返回的 `digest` 一致，提交前即可得知
    pub fn digest(&self) -> Result<String> {
        let mut hasher = Blake2b256::default();
        hasher.update(TRANSACTION_DIGEST_PREFIX);
        hasher.update(self.to_bytes()?);
        Ok(bs58::encode(hasher.finalize().digest).into_string())
    }
}

/// 由 Ed25519 公鑰推導 Sui 地址：`Blake2b256(flag || pk)`
pub fn sui_address(public_key: &[u8]) -> SuiAddress {
    let mut hasher = Blake2b256::default();
    hasher.update([ED25519_FLAG]);
    hasher.update(public_key);
    SuiAddress::new(hasher.finalize().digest)
}

/// Sui 序列化簽名：`flag || sig || pk`
pub fn serialize_signature(signature: &[u8], public_key: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(1 + signature.len() + public_key.len());
    bytes.push(ED25519_FLAG);
    bytes.extend_from_slice(signature);
    bytes.extend_from_slice(public_key);
    bytes
}

/// 已簽名交易（Base64 編碼，可直接提交）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub tx_bytes: String,
    pub signatures: Vec<String>,
    /// 被簽名的 intent 摘要
    pub signing_digest: [u8; 32],
    /// 交易摘要（base58）
    pub transaction_digest: String,
}

impl SignedTransaction {
    pub fn sign(data: &TransactionData, signer: &dyn Signer) -> Result<Self> {
        // 簽名標誌固定為 Ed25519
        if signer.algorithm_name() != ED25519_ALGORITHM {
            return Err(OpsError::Signing(format!(
                "{} signers cannot sign Sui transactions here, only {}",
                signer.algorithm_name(),
                ED25519_ALGORITHM
            )));
        }

        let tx_bytes = data.to_bytes()?;
        let signing_digest = data.signing_digest()?;
        let signature = signer.sign(&signing_digest)?;

        Ok(Self {
            tx_bytes: STANDARD.encode(&tx_bytes),
            signatures: vec![STANDARD.encode(serialize_signature(&signature, signer.public_key()))],
            signing_digest,
            transaction_digest: data.digest()?,
        })
    }
}
