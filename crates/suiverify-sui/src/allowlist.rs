//! Allowlist membership through the `allowlist` Move module.
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use suiverify_core::ledger::{LedgerClient, MoveCall};
use suiverify_core::policy::{PolicyObject, PolicyRegistry};
use suiverify_core::{PipelineError, SuiAddress, TransactionRef};

use crate::identity::SigningIdentity;
use crate::transaction::sign_and_execute;

const ALLOWLIST_MODULE: &str = "allowlist";
const ADD_FUNCTION: &str = "add";

/// Adds users to the allowlist with `<package>::allowlist::add(allowlist, cap, user)`.
pub struct SuiAllowlist {
    ledger: Arc<dyn LedgerClient>,
    package_id: SuiAddress,
    signer: SigningIdentity,
    gas_budget: u64,
}

impl SuiAllowlist {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        package_id: SuiAddress,
        signer: SigningIdentity,
        gas_budget: u64,
    ) -> Self {
        Self {
            ledger,
            package_id,
            signer,
            gas_budget,
        }
    }

    fn add_call(&self, user: &SuiAddress, policy: &PolicyObject) -> MoveCall {
        MoveCall::new(
            self.package_id.canonical(),
            ALLOWLIST_MODULE,
            ADD_FUNCTION,
            vec![
                json!(policy.object_id.canonical()),
                json!(policy.cap_id.canonical()),
                json!(user.canonical()),
            ],
        )
    }
}

#[async_trait]
impl PolicyRegistry for SuiAllowlist {
    async fn add_to_allowlist(
        &self,
        user: &SuiAddress,
        policy: &PolicyObject,
    ) -> Result<TransactionRef, PipelineError> {
        let call = self.add_call(user, policy);
        let response =
            sign_and_execute(self.ledger.as_ref(), &self.signer, &call, self.gas_budget).await?;
        Ok(response.transaction_ref())
    }
}
