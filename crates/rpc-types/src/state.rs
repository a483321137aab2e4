//! Account state overrides for `eth_call`/`eth_estimateGas`.

use chainrpc_primitives::{Address, Bytes, Hash, U256};
use std::collections::{BTreeMap, HashMap};

/// A mapping from address to the overrides applied to that account before
/// the call executes.
pub type StateOverride = HashMap<Address, AccountOverride>;

/// An error validating an [`AccountOverride`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateOverrideError {
    /// Both `state` and `stateDiff` were set; only one replacement mode is
    /// allowed per account.
    #[error("account override cannot set both `state` and `stateDiff`")]
    ConflictingStateAndStateDiff,
}

/// Per-account fake state applied before executing a call.
///
/// An override with every field left at its default represents a
/// self-destructed account. `state` and `state_diff` are mutually
/// exclusive; setting both is rejected rather than silently resolved, both
/// through [`AccountOverride::set_state`]/[`AccountOverride::set_state_diff`]
/// and when deserializing from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOverride {
    /// Fake nonce.
    #[serde(with = "crate::serde_helpers::quantity_opt", skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    /// Fake balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<U256>,
    /// Fake bytecode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Bytes>,
    /// Full storage replacement: every slot not listed reads as zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<BTreeMap<Hash, Hash>>,
    /// Partial storage replacement: unlisted slots keep their real value.
    #[serde(skip_serializing_if = "Option::is_none")]
    state_diff: Option<BTreeMap<Hash, Hash>>,
}

/// The wire shape of [`AccountOverride`], deserialized first so the
/// `state`/`state_diff` conflict can be rejected before an instance ever
/// exists.
#[derive(Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AccountOverrideRaw {
    #[serde(with = "crate::serde_helpers::quantity_opt")]
    nonce: Option<u64>,
    balance: Option<U256>,
    code: Option<Bytes>,
    state: Option<BTreeMap<Hash, Hash>>,
    state_diff: Option<BTreeMap<Hash, Hash>>,
}

impl TryFrom<AccountOverrideRaw> for AccountOverride {
    type Error = StateOverrideError;

    fn try_from(raw: AccountOverrideRaw) -> Result<Self, Self::Error> {
        if raw.state.is_some() && raw.state_diff.is_some() {
            return Err(StateOverrideError::ConflictingStateAndStateDiff);
        }
        Ok(Self {
            nonce: raw.nonce,
            balance: raw.balance,
            code: raw.code,
            state: raw.state,
            state_diff: raw.state_diff,
        })
    }
}

impl<'de> serde::Deserialize<'de> for AccountOverride {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        AccountOverrideRaw::deserialize(deserializer)
            .and_then(|raw| AccountOverride::try_from(raw).map_err(serde::de::Error::custom))
    }
}

impl AccountOverride {
    /// The full storage replacement, if set.
    pub fn state(&self) -> Option<&BTreeMap<Hash, Hash>> {
        self.state.as_ref()
    }

    /// The partial storage replacement, if set.
    pub fn state_diff(&self) -> Option<&BTreeMap<Hash, Hash>> {
        self.state_diff.as_ref()
    }

    /// Sets the full storage replacement, rejecting it if `state_diff` is
    /// already set.
    pub fn set_state(
        &mut self,
        state: impl IntoIterator<Item = (Hash, Hash)>,
    ) -> Result<(), StateOverrideError> {
        if self.state_diff.is_some() {
            return Err(StateOverrideError::ConflictingStateAndStateDiff);
        }
        self.state = Some(state.into_iter().collect());
        Ok(())
    }

    /// Sets the partial storage replacement, rejecting it if `state` is
    /// already set.
    pub fn set_state_diff(
        &mut self,
        state_diff: impl IntoIterator<Item = (Hash, Hash)>,
    ) -> Result<(), StateOverrideError> {
        if self.state.is_some() {
            return Err(StateOverrideError::ConflictingStateAndStateDiff);
        }
        self.state_diff = Some(state_diff.into_iter().collect());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_state_and_state_diff_together() {
        let mut over = AccountOverride::default();
        over.set_state([(Hash::ZERO, Hash::ZERO)]).unwrap();
        assert_eq!(
            over.set_state_diff([(Hash::ZERO, Hash::ZERO)]),
            Err(StateOverrideError::ConflictingStateAndStateDiff)
        );
    }

    #[test]
    fn accepts_state_alone() {
        let mut over = AccountOverride::default();
        assert!(over.set_state([(Hash::ZERO, Hash::ZERO)]).is_ok());
        assert!(over.state().is_some());
    }

    #[test]
    fn rejects_conflicting_fields_on_deserialize() {
        let json = r#"{"state":{},"stateDiff":{}}"#;
        let err = serde_json::from_str::<AccountOverride>(json).unwrap_err();
        assert!(err.to_string().contains("cannot set both"));
    }

    #[test]
    fn serializes_quantity_fields_as_hex() {
        let mut over = AccountOverride::default();
        over.nonce = Some(5);
        let json = serde_json::to_value(&over).unwrap();
        assert_eq!(json["nonce"], "0x5");
    }
}
