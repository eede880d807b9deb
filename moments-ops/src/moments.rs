//! moments 合約操作
//!
//! 每種合約調用對應 [`MomentsOperation`] 的一個變體，編譯為 [`CallPlan`]：
//! 輸入列表、命令列表、預期對象變更與 gas budget。
//! 對象輸入此時只有 ID，版本與所有權由提交器在執行前向帳本查詢。

use crate::error::{OpsError, Result};
use crate::transaction::{Argument, Command, ProgrammableMoveCall, StructTag, TypeTag};
use crate::types::{ObjectId, OpsConfig, SuiAddress};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// moments 模塊名
pub const MOMENTS_MODULE: &str = "moments";

/// Sui 框架包 (0x2)
pub const SUI_FRAMEWORK: ObjectId = ObjectId::new(framework_bytes());

const fn framework_bytes() -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[31] = 0x02;
    bytes
}

/// NFT 種類（Display 綁定的結構體）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NftKind {
    Platform,
    RestrictTransferable,
    NonTransferablePlatform,
}

impl NftKind {
    pub fn struct_name(&self) -> &'static str {
        match self {
            NftKind::Platform => "Platform",
            NftKind::RestrictTransferable => "RestrictTransferable",
            NftKind::NonTransferablePlatform => "NonTransferablePlatform",
        }
    }
}

impl fmt::Display for NftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.struct_name())
    }
}

impl FromStr for NftKind {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "platform" => Ok(NftKind::Platform),
            "restricttransferable" => Ok(NftKind::RestrictTransferable),
            "nontransferableplatform" | "nontransferable" => Ok(NftKind::NonTransferablePlatform),
            _ => Err(OpsError::Config(format!(
                "Unknown NFT kind '{}': expected platform, restrict-transferable or non-transferable-platform",
                s
            ))),
        }
    }
}

/// Display 字段（鍵與值一一對應）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFields {
    pub keys: Vec<String>,
    pub values: Vec<String>,
}

impl DisplayFields {
    /// 各種類的默認字段
    pub fn for_kind(kind: NftKind, souv_name: &str) -> Self {
        let (name, image_url, description) = match kind {
            NftKind::Platform => (
                "Platform POAP NFT".to_string(),
                "https://www.zilliondesigns.com/blog/wp-content/uploads/NFT.jpg",
                "A public transferable POAP NFT for event participation".to_string(),
            ),
            NftKind::RestrictTransferable => (
                "Restricted Transferable POAP NFT".to_string(),
                "https://www.zilliondesigns.com/blog/wp-content/uploads/NFT.jpg",
                "A restricted transferable POAP NFT for event participation".to_string(),
            ),
            NftKind::NonTransferablePlatform => (
                format!("Non-Transferable POAP NFT ({})", souv_name),
                "https://your-project.io/non-transferable.png",
                format!(
                    "A non-transferable POAP NFT for event participation ({})",
                    souv_name
                ),
            ),
        };

        let pairs = [
            ("name", name),
            ("image_url", image_url.to_string()),
            ("description", description),
            ("project_url", "https://your-project.io".to_string()),
            ("creator", "osamaa".to_string()),
            ("intellectual_property", "All rights reserved".to_string()),
            ("category", "POAP".to_string()),
        ];

        Self {
            keys: pairs.iter().map(|(k, _)| k.to_string()).collect(),
            values: pairs.into_iter().map(|(_, v)| v).collect(),
        }
    }

    /// 覆蓋已有鍵的值；新鍵按字母序追加
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        let mut sorted: Vec<(&String, &String)> = overrides.iter().collect();
        sorted.sort();

        for (key, value) in sorted {
            match self.keys.iter().position(|k| k == key) {
                Some(index) => self.values[index] = value.clone(),
                None => {
                    self.keys.push(key.clone());
                    self.values.push(value.clone());
                }
            }
        }
        self
    }
}

/// 合約上下文：包 ID、SOUV 類型與 gas budget
#[derive(Debug, Clone)]
pub struct MomentsContext {
    pub package_id: ObjectId,
    pub souv: StructTag,
    pub gas_budget: u64,
    pub display_gas_budget: u64,
}

impl MomentsContext {
    /// `souv_type` 可為模塊內名稱（如 `SOUV1`）或完整類型
    pub fn new(package_id: ObjectId, souv_type: &str) -> Result<Self> {
        let souv = if souv_type.contains("::") {
            souv_type.parse::<StructTag>()?
        } else {
            format!("{}::{}::{}", package_id, MOMENTS_MODULE, souv_type).parse::<StructTag>()?
        };

        Ok(Self {
            package_id,
            souv,
            gas_budget: 10_000_000,
            display_gas_budget: 50_000_000,
        })
    }

    pub fn from_config(config: &OpsConfig) -> Result<Self> {
        let package_id = config
            .package_id
            .as_deref()
            .ok_or_else(|| OpsError::Config("PACKAGE_ID is not configured".to_string()))?
            .parse()?;

        let mut ctx = Self::new(package_id, &config.souv_type)?;
        ctx.gas_budget = config.gas_budget;
        ctx.display_gas_budget = config.display_gas_budget;
        Ok(ctx)
    }

    pub fn souv_tag(&self) -> TypeTag {
        self.souv.clone().into()
    }

    /// `<package>::moments::<name><SOUV>`
    pub fn moments_type(&self, name: &str) -> TypeTag {
        StructTag::new(self.package_id, MOMENTS_MODULE, name, vec![self.souv_tag()]).into()
    }
}

/// 計劃中的輸入
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannedInput {
    /// BCS 編碼的純值
    Pure(Vec<u8>),
    /// 待解析的對象；若為共享對象，以 `mutable` 指定訪問方式
    Object { id: ObjectId, mutable: bool },
}

/// 執行成功後預期的對象變更
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedChange {
    /// 類型包含給定片段的新建對象
    Created(String),
    /// 類型完全相同的新建對象
    CreatedExact(TypeTag),
    /// 指定對象被修改
    Mutated(ObjectId),
    /// 不檢查
    None,
}

/// 合約調用計劃
#[derive(Debug, Clone, Serialize)]
pub struct CallPlan {
    pub operation: &'static str,
    pub inputs: Vec<PlannedInput>,
    pub commands: Vec<Command>,
    pub expected: ExpectedChange,
    pub gas_budget: u64,
}

impl CallPlan {
    /// 計劃引用的對象 ID（按輸入順序）
    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.inputs
            .iter()
            .filter_map(|input| match input {
                PlannedInput::Object { id, .. } => Some(*id),
                PlannedInput::Pure(_) => None,
            })
            .collect()
    }

    /// 第一個 MoveCall 命令
    pub fn primary_call(&self) -> Option<&ProgrammableMoveCall> {
        self.commands.iter().find_map(|command| match command {
            Command::MoveCall(call) => Some(call.as_ref()),
            Command::TransferObjects(..) => None,
        })
    }

    /// `package::module::function` 列表，用於日誌
    pub fn targets(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|command| match command {
                Command::MoveCall(call) => {
                    format!("{}::{}::{}", call.package, call.module, call.function)
                }
                Command::TransferObjects(..) => "TransferObjects".to_string(),
            })
            .collect()
    }
}

#[derive(Default)]
struct PlanBuilder {
    inputs: Vec<PlannedInput>,
    commands: Vec<Command>,
}

impl PlanBuilder {
    fn pure<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<Argument> {
        self.inputs.push(PlannedInput::Pure(bcs::to_bytes(value)?));
        Ok(Argument::Input((self.inputs.len() - 1) as u16))
    }

    fn object(&mut self, id: ObjectId, mutable: bool) -> Argument {
        let existing = self
            .inputs
            .iter_mut()
            .enumerate()
            .find_map(|(index, input)| match input {
                PlannedInput::Object { id: existing, mutable: m } if *existing == id => {
                    *m |= mutable;
                    Some(index)
                }
                _ => None,
            });

        let index = existing.unwrap_or_else(|| {
            self.inputs.push(PlannedInput::Object { id, mutable });
            self.inputs.len() - 1
        });
        Argument::Input(index as u16)
    }

    fn move_call(
        &mut self,
        package: ObjectId,
        module: &str,
        function: &str,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> Argument {
        self.commands.push(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module: module.to_string(),
            function: function.to_string(),
            type_arguments,
            arguments,
        })));
        Argument::Result((self.commands.len() - 1) as u16)
    }

    fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: Argument) {
        self.commands.push(Command::TransferObjects(objects, recipient));
    }

    fn finish(self, operation: &'static str, expected: ExpectedChange, gas_budget: u64) -> CallPlan {
        CallPlan {
            operation,
            inputs: self.inputs,
            commands: self.commands,
            expected,
            gas_budget,
        }
    }
}

/// moments 合約操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MomentsOperation {
    /// 為某種 NFT 創建 Display 並轉給發送者
    CreateDisplay {
        publisher: ObjectId,
        kind: NftKind,
        fields: DisplayFields,
    },
    /// 創建活動，持續 `duration_ms` 毫秒
    NewEvent { duration_ms: u64 },
    /// 創建供應上限（`None` 表示不限）
    CreateSupplyCap {
        admin_cap: ObjectId,
        limit: Option<u64>,
    },
    UpdateSupply {
        admin_cap: ObjectId,
        supply_cap: ObjectId,
        new_limit: u64,
    },
    MintNonTransferable {
        event: ObjectId,
        supply_cap: ObjectId,
        recipient: SuiAddress,
    },
    TransferRestrictTransferable {
        admin_cap: ObjectId,
        poap: ObjectId,
        event: ObjectId,
        recipient: SuiAddress,
    },
    /// 帶簽名校驗的轉移
    Transfer {
        recipient: SuiAddress,
        poap: ObjectId,
        public_keys: ObjectId,
        signed_data: Vec<u8>,
        msg: Vec<u8>,
    },
}

impl MomentsOperation {
    pub fn name(&self) -> &'static str {
        match self {
            MomentsOperation::CreateDisplay { .. } => "create_display",
            MomentsOperation::NewEvent { .. } => "new_event",
            MomentsOperation::CreateSupplyCap { .. } => "create_supply_cap",
            MomentsOperation::UpdateSupply { .. } => "update_supply",
            MomentsOperation::MintNonTransferable { .. } => "mint_non_transferable",
            MomentsOperation::TransferRestrictTransferable { .. } => {
                "transfer_restrict_transferable"
            }
            MomentsOperation::Transfer { .. } => "transfer",
        }
    }

    /// 編譯為調用計劃；`sender` 用於把新建對象轉回給自己
    pub fn plan(&self, ctx: &MomentsContext, sender: SuiAddress) -> Result<CallPlan> {
        let mut b = PlanBuilder::default();
        let pkg = ctx.package_id;
        let souv = ctx.souv_tag();

        let plan = match self {
            MomentsOperation::CreateDisplay {
                publisher,
                kind,
                fields,
            } => {
                if fields.keys.len() != fields.values.len() {
                    return Err(OpsError::Config(format!(
                        "Display fields mismatch: {} keys, {} values",
                        fields.keys.len(),
                        fields.values.len()
                    )));
                }

                let nft_type = ctx.moments_type(kind.struct_name());
                let publisher = b.object(*publisher, true);
                let keys = b.pure(&fields.keys)?;
                let values = b.pure(&fields.values)?;

                let display = b.move_call(
                    SUI_FRAMEWORK,
                    "display",
                    "new_with_fields",
                    vec![nft_type.clone()],
                    vec![publisher, keys, values],
                );
                b.move_call(
                    SUI_FRAMEWORK,
                    "display",
                    "update_version",
                    vec![nft_type.clone()],
                    vec![display],
                );
                let owner = b.pure(&sender)?;
                b.transfer_objects(vec![display], owner);

                let display_type =
                    StructTag::new(SUI_FRAMEWORK, "display", "Display", vec![nft_type]).into();
                b.finish(
                    self.name(),
                    ExpectedChange::CreatedExact(display_type),
                    ctx.display_gas_budget,
                )
            }

            MomentsOperation::NewEvent { duration_ms } => {
                let duration = b.pure(duration_ms)?;
                let clock = b.object(ObjectId::CLOCK, false);
                let event = b.move_call(
                    pkg,
                    MOMENTS_MODULE,
                    "new_event",
                    vec![souv],
                    vec![duration, clock],
                );
                let owner = b.pure(&sender)?;
                b.move_call(
                    SUI_FRAMEWORK,
                    "transfer",
                    "public_transfer",
                    vec![ctx.moments_type("Event")],
                    vec![event, owner],
                );
                b.finish(
                    self.name(),
                    ExpectedChange::Created("::moments::Event".to_string()),
                    ctx.gas_budget,
                )
            }

            MomentsOperation::CreateSupplyCap { admin_cap, limit } => {
                let admin = b.object(*admin_cap, false);
                let limit = b.pure(limit)?;
                let cap = b.move_call(
                    pkg,
                    MOMENTS_MODULE,
                    "create_supply_cap",
                    vec![souv],
                    vec![admin, limit],
                );
                let owner = b.pure(&sender)?;
                b.move_call(
                    SUI_FRAMEWORK,
                    "transfer",
                    "public_transfer",
                    vec![ctx.moments_type("SupplyCap")],
                    vec![cap, owner],
                );
                b.finish(
                    self.name(),
                    ExpectedChange::Created("::moments::SupplyCap".to_string()),
                    ctx.gas_budget,
                )
            }

            MomentsOperation::UpdateSupply {
                admin_cap,
                supply_cap,
                new_limit,
            } => {
                let admin = b.object(*admin_cap, false);
                let cap = b.object(*supply_cap, true);
                let limit = b.pure(new_limit)?;
                b.move_call(
                    pkg,
                    MOMENTS_MODULE,
                    "update_supply",
                    vec![souv],
                    vec![admin, cap, limit],
                );
                b.finish(self.name(), ExpectedChange::Mutated(*supply_cap), ctx.gas_budget)
            }

            MomentsOperation::MintNonTransferable {
                event,
                supply_cap,
                recipient,
            } => {
                let event = b.object(*event, true);
                let cap = b.object(*supply_cap, true);
                let recipient = b.pure(recipient)?;
                let clock = b.object(ObjectId::CLOCK, false);
                b.move_call(
                    pkg,
                    MOMENTS_MODULE,
                    "mint_non_transferable",
                    vec![souv],
                    vec![event, cap, recipient, clock],
                );
                b.finish(self.name(), ExpectedChange::None, ctx.gas_budget)
            }

            MomentsOperation::TransferRestrictTransferable {
                admin_cap,
                poap,
                event,
                recipient,
            } => {
                let admin = b.object(*admin_cap, false);
                let poap = b.object(*poap, true);
                let event = b.object(*event, true);
                let recipient = b.pure(recipient)?;
                let clock = b.object(ObjectId::CLOCK, false);
                b.move_call(
                    pkg,
                    MOMENTS_MODULE,
                    "transfer_restrict_transferable",
                    vec![souv],
                    vec![admin, poap, event, recipient, clock],
                );
                b.finish(self.name(), ExpectedChange::None, ctx.gas_budget)
            }

            MomentsOperation::Transfer {
                recipient,
                poap,
                public_keys,
                signed_data,
                msg,
            } => {
                let recipient = b.pure(recipient)?;
                let poap = b.object(*poap, true);
                let keys = b.object(*public_keys, true);
                let signed_data = b.pure(signed_data)?;
                let msg = b.pure(msg)?;
                b.move_call(
                    pkg,
                    MOMENTS_MODULE,
                    "transfer",
                    vec![souv],
                    vec![recipient, poap, keys, signed_data, msg],
                );
                b.finish(self.name(), ExpectedChange::None, ctx.gas_budget)
            }
        };

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGE: &str = "0x3e6297ed667f8a70b73bce1110d4062d483a7e07f5c1d3d2a7ba864af2f1bb72";

    fn ctx() -> MomentsContext {
        MomentsContext::new(PACKAGE.parse().unwrap(), "SOUV1").unwrap()
    }

    fn sender() -> SuiAddress {
        SuiAddress::new([0x11; 32])
    }

    fn id(byte: u8) -> ObjectId {
        ObjectId::new([byte; 32])
    }

    fn souv_string() -> String {
        format!("{}::moments::SOUV1", PACKAGE)
    }

    #[test]
    fn test_new_event_plan() {
        let plan = MomentsOperation::NewEvent {
            duration_ms: 86_400_000,
        }
        .plan(&ctx(), sender())
        .unwrap();

        assert_eq!(plan.inputs[0], PlannedInput::Pure(86_400_000u64.to_le_bytes().to_vec()));
        assert_eq!(
            plan.inputs[1],
            PlannedInput::Object {
                id: ObjectId::CLOCK,
                mutable: false
            }
        );

        let call = plan.primary_call().unwrap();
        assert_eq!(call.function, "new_event");
        assert_eq!(call.type_arguments[0].to_string(), souv_string());
        assert_eq!(call.arguments, vec![Argument::Input(0), Argument::Input(1)]);

        let Command::MoveCall(transfer) = &plan.commands[1] else {
            panic!("expected public_transfer");
        };
        assert_eq!(transfer.package, SUI_FRAMEWORK);
        assert_eq!(transfer.function, "public_transfer");
        assert_eq!(
            transfer.type_arguments[0].to_string(),
            format!("{}::moments::Event<{}>", PACKAGE, souv_string())
        );
        assert_eq!(transfer.arguments, vec![Argument::Result(0), Argument::Input(2)]);

        assert_eq!(plan.expected, ExpectedChange::Created("::moments::Event".to_string()));
        assert_eq!(plan.gas_budget, 10_000_000);
    }

    #[test]
    fn test_create_supply_cap_option_encoding() {
        let with_limit = MomentsOperation::CreateSupplyCap {
            admin_cap: id(1),
            limit: Some(1000),
        }
        .plan(&ctx(), sender())
        .unwrap();

        let mut expected = vec![1u8];
        expected.extend_from_slice(&1000u64.to_le_bytes());
        assert_eq!(with_limit.inputs[1], PlannedInput::Pure(expected));

        let unlimited = MomentsOperation::CreateSupplyCap {
            admin_cap: id(1),
            limit: None,
        }
        .plan(&ctx(), sender())
        .unwrap();
        assert_eq!(unlimited.inputs[1], PlannedInput::Pure(vec![0]));
        assert_eq!(
            unlimited.expected,
            ExpectedChange::Created("::moments::SupplyCap".to_string())
        );
    }

    #[test]
    fn test_update_supply_expects_mutation() {
        let plan = MomentsOperation::UpdateSupply {
            admin_cap: id(1),
            supply_cap: id(2),
            new_limit: 2000,
        }
        .plan(&ctx(), sender())
        .unwrap();

        assert_eq!(plan.commands.len(), 1);
        assert_eq!(plan.object_ids(), vec![id(1), id(2)]);
        assert_eq!(plan.expected, ExpectedChange::Mutated(id(2)));
    }

    #[test]
    fn test_mint_and_restricted_transfer_use_clock() {
        let mint = MomentsOperation::MintNonTransferable {
            event: id(3),
            supply_cap: id(2),
            recipient: SuiAddress::new([0x22; 32]),
        }
        .plan(&ctx(), sender())
        .unwrap();

        assert_eq!(mint.primary_call().unwrap().function, "mint_non_transferable");
        assert_eq!(mint.object_ids(), vec![id(3), id(2), ObjectId::CLOCK]);
        assert_eq!(mint.inputs[2], PlannedInput::Pure(vec![0x22; 32]));
        assert_eq!(mint.expected, ExpectedChange::None);

        let restricted = MomentsOperation::TransferRestrictTransferable {
            admin_cap: id(1),
            poap: id(4),
            event: id(3),
            recipient: SuiAddress::new([0x22; 32]),
        }
        .plan(&ctx(), sender())
        .unwrap();
        assert_eq!(restricted.primary_call().unwrap().arguments.len(), 5);
        assert_eq!(
            restricted.object_ids(),
            vec![id(1), id(4), id(3), ObjectId::CLOCK]
        );
    }

    #[test]
    fn test_transfer_passes_signature_bytes() {
        let plan = MomentsOperation::Transfer {
            recipient: SuiAddress::new([0x22; 32]),
            poap: id(4),
            public_keys: id(5),
            signed_data: vec![9; 64],
            msg: b"hello world\0\0\0\0\0\0\0\x02".to_vec(),
        }
        .plan(&ctx(), sender())
        .unwrap();

        let call = plan.primary_call().unwrap();
        assert_eq!(call.function, "transfer");
        assert_eq!(call.arguments.len(), 5);

        // vector<u8> 帶 ULEB 長度前綴
        let PlannedInput::Pure(sig) = &plan.inputs[3] else {
            panic!("expected pure signature input");
        };
        assert_eq!(sig[0], 64);
        assert_eq!(sig.len(), 65);
    }

    #[test]
    fn test_create_display_plan() {
        let fields = DisplayFields::for_kind(NftKind::RestrictTransferable, "SOUV1");
        let plan = MomentsOperation::CreateDisplay {
            publisher: id(7),
            kind: NftKind::RestrictTransferable,
            fields: fields.clone(),
        }
        .plan(&ctx(), sender())
        .unwrap();

        assert_eq!(plan.commands.len(), 3);
        assert_eq!(plan.gas_budget, 50_000_000);
        assert_eq!(
            plan.inputs[1],
            PlannedInput::Pure(bcs::to_bytes(&fields.keys).unwrap())
        );

        let call = plan.primary_call().unwrap();
        assert_eq!(call.module, "display");
        assert_eq!(call.function, "new_with_fields");

        assert!(matches!(
            &plan.commands[2],
            Command::TransferObjects(objects, Argument::Input(3)) if objects == &vec![Argument::Result(0)]
        ));

        let ExpectedChange::CreatedExact(expected) = &plan.expected else {
            panic!("expected exact display type");
        };
        assert_eq!(
            expected.to_string(),
            format!(
                "{}::display::Display<{}::moments::RestrictTransferable<{}>>",
                SUI_FRAMEWORK,
                PACKAGE,
                souv_string()
            )
        );
    }

    #[test]
    fn test_display_fields_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert("creator".to_string(), "moments team".to_string());
        overrides.insert("link".to_string(), "https://example.org".to_string());

        let fields = DisplayFields::for_kind(NftKind::NonTransferablePlatform, "SOUV2")
            .with_overrides(&overrides);

        assert_eq!(fields.keys.len(), 8);
        assert_eq!(fields.values[0], "Non-Transferable POAP NFT (SOUV2)");
        assert_eq!(fields.values[4], "moments team");
        assert_eq!(fields.keys[7], "link");
    }

    #[test]
    fn test_nft_kind_parsing() {
        assert_eq!("platform".parse::<NftKind>().unwrap(), NftKind::Platform);
        assert_eq!(
            "restrict-transferable".parse::<NftKind>().unwrap(),
            NftKind::RestrictTransferable
        );
        assert_eq!(
            "NonTransferablePlatform".parse::<NftKind>().unwrap(),
            NftKind::NonTransferablePlatform
        );
        assert!("bogus".parse::<NftKind>().is_err());
    }

    #[test]
    fn test_context_accepts_qualified_souv() {
        let qualified = MomentsContext::new(id(1), "0x99::souv::SOUV9").unwrap();
        assert_eq!(qualified.souv.name, "SOUV9");
        assert_eq!(qualified.souv.module, "souv");

        assert!(MomentsContext::new(id(1), "not a type").is_err());
    }
}
