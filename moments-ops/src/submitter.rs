//! 交易提交流程
//!
//! [`CallPlan`] → 解析對象輸入 → 選擇 gas → 構造並簽名 → 執行 → 檢查狀態 → 查找預期變更

use crate::error::{OpsError, Result};
use crate::moments::{CallPlan, ExpectedChange, PlannedInput};
use crate::sui_client::LedgerClient;
use crate::transaction::{
    sui_address, ObjectArg, ProgrammableTransaction, ProgrammableTransactionBuilder,
    SignedTransaction, TransactionData,
};
use crate::types::{ExecutionOutcome, ExecutionStatus, ObjectChange, ObjectId, ObjectRef, Owner, SuiAddress};
use moments_signer::Signer;
use tracing::{debug, info, warn};

/// 單筆交易最多使用的 gas 幣數
const MAX_GAS_COINS: usize = 255;

/// 提交結果
#[derive(Debug, Clone)]
pub struct Submission {
    pub outcome: ExecutionOutcome,
    /// 與計劃預期相符的對象變更
    pub matched: Option<ObjectChange>,
}

impl Submission {
    pub fn digest(&self) -> &str {
        &self.outcome.digest
    }

    pub fn matched_object_id(&self) -> Option<&str> {
        self.matched.as_ref().and_then(|change| change.object_id())
    }
}

/// 交易提交器
pub struct Submitter<'a> {
    client: &'a dyn LedgerClient,
    signer: &'a dyn Signer,
    sender: SuiAddress,
}

impl<'a> Submitter<'a> {
    pub fn new(client: &'a dyn LedgerClient, signer: &'a dyn Signer) -> Self {
        let sender = sui_address(signer.public_key());
        Self {
            client,
            signer,
            sender,
        }
    }

    pub fn sender(&self) -> SuiAddress {
        self.sender
    }

    /// 查詢對象所有權，轉為交易輸入
    async fn resolve_object(&self, id: &ObjectId, mutable: bool) -> Result<ObjectArg> {
        let info = self.client.get_object(id).await?;
        debug!("Resolved {} as {:?} at version {}", id, info.owner, info.object_ref.version);

        match info.owner {
            Owner::Shared {
                initial_shared_version,
            } => Ok(ObjectArg::SharedObject {
                id: *id,
                initial_shared_version,
                mutable,
            }),
            Owner::AddressOwner(owner) => {
                if owner != self.sender {
                    warn!("Object {} is owned by {}, not by sender {}", id, owner, self.sender);
                }
                Ok(ObjectArg::ImmOrOwnedObject(info.object_ref))
            }
            Owner::Immutable => Ok(ObjectArg::ImmOrOwnedObject(info.object_ref)),
            Owner::ConsensusAddressOwner {
                start_version,
                owner,
            } => {
                if owner != self.sender {
                    warn!("Object {} is owned by {}, not by sender {}", id, owner, self.sender);
                }
                Ok(ObjectArg::SharedObject {
                    id: *id,
                    initial_shared_version: start_version,
                    mutable,
                })
            }
            Owner::ObjectOwner(parent) => Err(OpsError::SuiClient(format!(
                "Object {} is owned by object {} and cannot be used as a transaction input",
                id, parent
            ))),
        }
    }

    /// 把計劃的輸入解析為可執行的可編程交易
    pub async fn resolve(&self, plan: &CallPlan) -> Result<ProgrammableTransaction> {
        let mut builder = ProgrammableTransactionBuilder::new();

        for input in &plan.inputs {
            match input {
                PlannedInput::Pure(bytes) => {
                    builder.pure_bytes(bytes.clone());
                }
                PlannedInput::Object { id, mutable } => {
                    let arg = self.resolve_object(id, *mutable).await?;
                    builder.obj(arg)?;
                }
            }
        }

        for command in &plan.commands {
            builder.command(command.clone());
        }

        Ok(builder.finish())
    }

    /// 按餘額從大到小選取 gas 幣，直到覆蓋 `budget`
    ///
    /// 計劃中作為輸入的對象不會被選為 gas
    pub async fn select_gas(&self, budget: u64, exclude: &[ObjectId]) -> Result<Vec<ObjectRef>> {
        let mut coins = self.client.get_gas_coins(&self.sender).await?;
        coins.retain(|coin| !exclude.contains(&coin.object_ref.object_id));
        coins.sort_by(|a, b| b.balance.cmp(&a.balance));

        let mut selected = Vec::new();
        let mut total: u128 = 0;
        for coin in coins.into_iter().take(MAX_GAS_COINS) {
            total += coin.balance as u128;
            selected.push(coin.object_ref);
            if total >= budget as u128 {
                debug!("Selected {} gas coin(s) totalling {} MIST", selected.len(), total);
                return Ok(selected);
            }
        }

        Err(OpsError::InsufficientGas(format!(
            "sender {} has {} MIST in gas coins, budget is {} MIST",
            self.sender, total, budget
        )))
    }

    /// 構造未簽名交易
    pub async fn build(&self, plan: &CallPlan) -> Result<TransactionData> {
        let pt = self.resolve(plan).await?;
        let price = self.client.reference_gas_price().await?;
        let payment = self.select_gas(plan.gas_budget, &plan.object_ids()).await?;

        Ok(TransactionData::new_programmable(
            self.sender,
            payment,
            pt,
            plan.gas_budget,
            price,
        ))
    }

    /// 簽名並執行計劃
    ///
    /// 帳本返回失敗狀態時返回 [`OpsError::TransactionFailed`]，錯誤信息原樣保留。
    pub async fn submit(&self, plan: &CallPlan) -> Result<Submission> {
        info!(
            "Submitting {} as {} ({})",
            plan.operation,
            self.sender,
            plan.targets().join(", ")
        );

        let balance = self.client.get_balance(&self.sender).await?;
        info!("Signer balance: {} MIST", balance);

        let data = self.build(plan).await?;
        let signed = SignedTransaction::sign(&data, self.signer)?;
        debug!("Signing digest: {}", hex::encode(signed.signing_digest));

        info!("Transaction digest: {}", signed.transaction_digest);

        // 節點明確拒絕時交易未執行；其餘錯誤下交易可能已上鏈
        let outcome = match self.client.execute_transaction(&signed).await {
            Ok(outcome) => outcome,
            Err(err @ OpsError::Rpc { .. }) => {
                warn!("Transaction {} rejected: {}", signed.transaction_digest, err);
                return Err(err);
            }
            Err(err) => {
                return Err(OpsError::Unconfirmed {
                    digest: signed.transaction_digest.clone(),
                    reason: err.to_string(),
                })
            }
        };

        if outcome.digest != signed.transaction_digest {
            warn!(
                "Ledger reported digest {}, expected {}",
                outcome.digest, signed.transaction_digest
            );
        }

        if let ExecutionStatus::Failure { error } = &outcome.status {
            return Err(OpsError::TransactionFailed(error.clone()));
        }

        for change in &outcome.object_changes {
            debug!(
                "Object change: {} {} {}",
                change.kind(),
                change.object_id().unwrap_or("-"),
                change.object_type().unwrap_or("-")
            );
        }

        let matched = match &plan.expected {
            ExpectedChange::Created(fragment) => {
                let found = outcome.find_created(fragment).cloned();
                if found.is_none() {
                    warn!("No created object matching '{}'", fragment);
                }
                found
            }
            ExpectedChange::CreatedExact(object_type) => {
                let found = outcome.find_created_exact(object_type).cloned();
                if found.is_none() {
                    return Err(OpsError::ObjectNotFound(format!(
                        "transaction {} succeeded but created no {}",
                        outcome.digest, object_type
                    )));
                }
                found
            }
            ExpectedChange::Mutated(id) => {
                let found = outcome.find_mutated(id).cloned();
                if found.is_none() {
                    warn!("Object {} was not reported as mutated", id);
                }
                found
            }
            ExpectedChange::None => None,
        };

        if let Some(id) = matched.as_ref().and_then(|change| change.object_id()) {
            info!("✅ {} succeeded: {}", plan.operation, id);
        } else {
            info!("✅ {} succeeded", plan.operation);
        }

        Ok(Submission { outcome, matched })
    }
}
