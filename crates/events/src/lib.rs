//! System-contract events, governance proposals, contract verification and
//! ABI storage (§4.8).
//!
//! Mint/burn events and governance proposals follow the log-style
//! data-plus-existence-index shape used elsewhere in this engine.
//! Minter/validator/blacklist/emergency-pause changes are small enough that
//! the per-`(actor, height)` record doubles as its own history entry, with
//! no separate index.

use std::sync::Arc;

use alloy_primitives::{Address, U256};

use chainidx_backend::Backend;
use chainidx_codec::{decode, decode_big_int, encode, encode_big_int};
use chainidx_types::{
    AbiReader, AbiWriter, BlacklistEvent, BurnEvent, ContractVerificationReader, ContractVerificationWriter,
    DepositMintProposal, EmergencyPauseEvent, Error, GasTipUpdateEvent, GovernanceProposal, MintEvent,
    MinterConfigEvent, ProposalStatus, ProposalVote, Result, SignedU256, SystemContractReader, SystemContractWriter,
    ValidatorChangeEvent, paginate,
};

/// System-contract event storage, backed by one ordered key/value handle.
pub struct EventsStore {
    backend: Arc<dyn Backend>,
}

impl EventsStore {
    /// Wraps `backend` in an [`EventsStore`].
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    fn range_scan<T, F>(&self, lower: &[u8], upper: &[u8], limit: usize, offset: usize, token: &chainidx_types::CancelToken, decode_value: F) -> Result<Vec<T>>
    where
        F: Fn(&[u8]) -> Result<T>,
    {
        let mut matched = Vec::new();
        for item in self.backend.new_iterator(lower, upper)? {
            token.check()?;
            let (_, value) = item?;
            matched.push(decode_value(&value)?);
        }
        Ok(paginate(matched.into_iter(), offset, limit))
    }

    fn membership_scan(&self, prefix: Vec<u8>, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<Address>> {
        let upper = chainidx_backend::prefix_upper_bound(&prefix);
        let mut matched = Vec::new();
        for item in self.backend.new_iterator(&prefix, &upper)? {
            token.check()?;
            let (key, _) = item?;
            if let Some(segment) = key.rsplit(|&b| b == b'/').next() {
                if let Some(address) = parse_address_segment(segment) {
                    matched.push(address);
                }
            }
        }
        Ok(paginate(matched.into_iter(), offset, limit))
    }

    fn set_membership(&self, marker_key: Vec<u8>, present: bool) -> Result<()> {
        if present {
            self.backend.put(&marker_key, &[])
        } else {
            self.backend.delete(&marker_key)
        }
    }
}

fn parse_address_segment(segment: &[u8]) -> Option<Address> {
    let text = std::str::from_utf8(segment).ok()?;
    let bytes = alloy_primitives::hex::decode(text).ok()?;
    Address::try_from(bytes.as_slice()).ok()
}

fn validate_range(from: u64, to: u64) -> Result<()> {
    if from > to {
        return Err(Error::InvalidArgument(format!("from ({from}) > to ({to})")));
    }
    Ok(())
}

impl SystemContractReader for EventsStore {
    fn get_mint_events(&self, from: u64, to: u64, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<MintEvent>> {
        token.check()?;
        validate_range(from, to)?;
        let lower = chainidx_keys::mint_event(from, 0, 0);
        let upper = chainidx_keys::mint_event(to.saturating_add(1), 0, 0);
        self.range_scan(&lower, &upper, limit, offset, token, |v| decode(v))
    }

    fn get_mint_events_by_actor(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<MintEvent>> {
        token.check()?;
        validate_range(from, to)?;
        let lower = chainidx_keys::mint_event_by_actor(actor, from, 0, 0);
        let upper = chainidx_keys::mint_event_by_actor(actor, to.saturating_add(1), 0, 0);
        let mut matched = Vec::new();
        for item in self.backend.new_iterator(&lower, &upper)? {
            token.check()?;
            let (key, _) = item?;
            let Some((h, ti, li)) = chainidx_keys::parse_block_tx_log_suffix(&key) else {
                continue;
            };
            if let Some(bytes) = self.backend.get(&chainidx_keys::mint_event(h, ti, li))? {
                matched.push(decode(&bytes)?);
            }
        }
        Ok(paginate(matched.into_iter(), offset, limit))
    }

    fn get_burn_events(&self, from: u64, to: u64, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<BurnEvent>> {
        token.check()?;
        validate_range(from, to)?;
        let lower = chainidx_keys::burn_event(from, 0, 0);
        let upper = chainidx_keys::burn_event(to.saturating_add(1), 0, 0);
        self.range_scan(&lower, &upper, limit, offset, token, |v| decode(v))
    }

    fn get_burn_events_by_actor(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<BurnEvent>> {
        token.check()?;
        validate_range(from, to)?;
        let lower = chainidx_keys::burn_event_by_actor(actor, from, 0, 0);
        let upper = chainidx_keys::burn_event_by_actor(actor, to.saturating_add(1), 0, 0);
        let mut matched = Vec::new();
        for item in self.backend.new_iterator(&lower, &upper)? {
            token.check()?;
            let (key, _) = item?;
            let Some((h, ti, li)) = chainidx_keys::parse_block_tx_log_suffix(&key) else {
                continue;
            };
            if let Some(bytes) = self.backend.get(&chainidx_keys::burn_event(h, ti, li))? {
                matched.push(decode(&bytes)?);
            }
        }
        Ok(paginate(matched.into_iter(), offset, limit))
    }

    fn get_minter_config_history(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<MinterConfigEvent>> {
        token.check()?;
        validate_range(from, to)?;
        let lower = chainidx_keys::minter_config_event(actor, from);
        let upper = chainidx_keys::minter_config_event(actor, to.saturating_add(1));
        self.range_scan(&lower, &upper, limit, offset, token, |v| decode(v))
    }

    fn get_validator_changes(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<ValidatorChangeEvent>> {
        token.check()?;
        validate_range(from, to)?;
        let lower = chainidx_keys::validator_change_event(actor, from);
        let upper = chainidx_keys::validator_change_event(actor, to.saturating_add(1));
        self.range_scan(&lower, &upper, limit, offset, token, |v| decode(v))
    }

    fn get_blacklist_events(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<BlacklistEvent>> {
        token.check()?;
        validate_range(from, to)?;
        let lower = chainidx_keys::blacklist_event(actor, from);
        let upper = chainidx_keys::blacklist_event(actor, to.saturating_add(1));
        self.range_scan(&lower, &upper, limit, offset, token, |v| decode(v))
    }

    fn get_emergency_pause_history(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<EmergencyPauseEvent>> {
        token.check()?;
        validate_range(from, to)?;
        let lower = chainidx_keys::emergency_pause_event(actor, from);
        let upper = chainidx_keys::emergency_pause_event(actor, to.saturating_add(1));
        self.range_scan(&lower, &upper, limit, offset, token, |v| decode(v))
    }

    fn get_gas_tip_history(&self, from: u64, to: u64, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<GasTipUpdateEvent>> {
        token.check()?;
        validate_range(from, to)?;
        let lower = chainidx_keys::gas_tip_event(from);
        let upper = chainidx_keys::gas_tip_event(to.saturating_add(1));
        self.range_scan(&lower, &upper, limit, offset, token, |v| decode(v))
    }

    fn is_minter(&self, address: Address, token: &chainidx_types::CancelToken) -> Result<bool> {
        token.check()?;
        Ok(self.backend.has(&chainidx_keys::active_minter(address))?)
    }

    fn is_validator(&self, address: Address, token: &chainidx_types::CancelToken) -> Result<bool> {
        token.check()?;
        Ok(self.backend.has(&chainidx_keys::active_validator(address))?)
    }

    fn is_blacklisted(&self, address: Address, token: &chainidx_types::CancelToken) -> Result<bool> {
        token.check()?;
        Ok(self.backend.has(&chainidx_keys::active_blacklisted(address))?)
    }

    fn get_active_minters(&self, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<Address>> {
        token.check()?;
        self.membership_scan(chainidx_keys::active_minters_prefix(), limit, offset, token)
    }

    fn get_active_validators(&self, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<Address>> {
        token.check()?;
        self.membership_scan(chainidx_keys::active_validators_prefix(), limit, offset, token)
    }

    fn get_blacklisted_addresses(&self, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<Address>> {
        token.check()?;
        self.membership_scan(chainidx_keys::active_blacklist_prefix(), limit, offset, token)
    }

    fn get_total_supply(&self, token: &chainidx_types::CancelToken) -> Result<U256> {
        token.check()?;
        match self.backend.get(&chainidx_keys::total_supply())? {
            Some(bytes) => decode_big_int(&bytes),
            None => Ok(U256::ZERO),
        }
    }

    fn get_proposal(&self, contract: Address, id: u64, token: &chainidx_types::CancelToken) -> Result<GovernanceProposal> {
        token.check()?;
        let bytes = self.backend.get(&chainidx_keys::gov_proposal(contract, id))?.ok_or(Error::NotFound)?;
        decode(&bytes)
    }

    fn get_proposals(&self, contract: Address, status: ProposalStatus, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<GovernanceProposal>> {
        token.check()?;
        let prefix = chainidx_keys::gov_proposal_status_prefix(contract, status.as_key_segment());
        let upper = chainidx_backend::prefix_upper_bound(&prefix);
        let mut matched = Vec::new();
        for item in self.backend.new_iterator(&prefix, &upper)? {
            token.check()?;
            let (key, _) = item?;
            let Some(segment) = key.rsplit(|&b| b == b'/').next() else {
                continue;
            };
            let Some(id) = chainidx_keys::segments::parse_wide(segment) else {
                continue;
            };
            if let Some(bytes) = self.backend.get(&chainidx_keys::gov_proposal(contract, id))? {
                matched.push(decode(&bytes)?);
            }
        }
        Ok(paginate(matched.into_iter(), offset, limit))
    }

    fn get_vote(&self, contract: Address, id: u64, voter: Address, token: &chainidx_types::CancelToken) -> Result<ProposalVote> {
        token.check()?;
        let bytes = self.backend.get(&chainidx_keys::gov_vote(contract, id, voter))?.ok_or(Error::NotFound)?;
        decode(&bytes)
    }

    fn get_votes(&self, contract: Address, id: u64, limit: usize, offset: usize, token: &chainidx_types::CancelToken) -> Result<Vec<ProposalVote>> {
        token.check()?;
        let lower = chainidx_keys::gov_votes_prefix(contract, id);
        let upper = chainidx_backend::prefix_upper_bound(&lower);
        self.range_scan(&lower, &upper, limit, offset, token, |v| decode(v))
    }

    fn get_deposit_mint_proposal(&self, contract: Address, id: u64, token: &chainidx_types::CancelToken) -> Result<DepositMintProposal> {
        token.check()?;
        let bytes = self
            .backend
            .get(&chainidx_keys::deposit_mint_proposal(contract, id))?
            .ok_or(Error::NotFound)?;
        decode(&bytes)
    }
}

impl SystemContractWriter for EventsStore {
    fn set_mint_event(&self, event: &MintEvent) -> Result<()> {
        let (h, ti, li) = (event.block_number, event.tx_index, event.log_index);
        let mut batch = self.backend.new_batch();
        batch.put(&chainidx_keys::mint_event(h, ti, li), &encode(event)?);
        batch.put(&chainidx_keys::mint_event_by_actor(event.actor, h, ti, li), &[]);
        batch.commit()
    }

    fn set_burn_event(&self, event: &BurnEvent) -> Result<()> {
        let (h, ti, li) = (event.block_number, event.tx_index, event.log_index);
        let mut batch = self.backend.new_batch();
        batch.put(&chainidx_keys::burn_event(h, ti, li), &encode(event)?);
        batch.put(&chainidx_keys::burn_event_by_actor(event.actor, h, ti, li), &[]);
        batch.commit()
    }

    fn set_minter_config_event(&self, event: &MinterConfigEvent) -> Result<()> {
        self.backend.put(&chainidx_keys::minter_config_event(event.actor, event.block_number), &encode(event)?)?;
        self.set_membership(chainidx_keys::active_minter(event.actor), event.is_minter)
    }

    fn set_validator_change_event(&self, event: &ValidatorChangeEvent) -> Result<()> {
        self.backend
            .put(&chainidx_keys::validator_change_event(event.actor, event.block_number), &encode(event)?)?;
        self.set_membership(chainidx_keys::active_validator(event.actor), event.is_validator)
    }

    fn set_blacklist_event(&self, event: &BlacklistEvent) -> Result<()> {
        self.backend.put(&chainidx_keys::blacklist_event(event.actor, event.block_number), &encode(event)?)?;
        self.set_membership(chainidx_keys::active_blacklisted(event.actor), event.blacklisted)
    }

    fn set_gas_tip_update(&self, event: &GasTipUpdateEvent) -> Result<()> {
        self.backend.put(&chainidx_keys::gas_tip_event(event.block_number), &encode(event)?)
    }

    fn set_emergency_pause_event(&self, event: &EmergencyPauseEvent) -> Result<()> {
        self.backend
            .put(&chainidx_keys::emergency_pause_event(event.actor, event.block_number), &encode(event)?)
    }

    fn apply_total_supply_delta(&self, delta: SignedU256) -> Result<U256> {
        let current = match self.backend.get(&chainidx_keys::total_supply())? {
            Some(bytes) => decode_big_int(&bytes)?,
            None => U256::ZERO,
        };
        let updated = delta
            .apply(current)
            .ok_or_else(|| Error::InvalidArgument("total supply delta would go negative".to_string()))?;
        self.backend.put(&chainidx_keys::total_supply(), &encode_big_int(updated))?;
        Ok(updated)
    }

    fn set_proposal(&self, proposal: &GovernanceProposal) -> Result<()> {
        let mut batch = self.backend.new_batch();
        if let Some(bytes) = self.backend.get(&chainidx_keys::gov_proposal(proposal.contract, proposal.id))? {
            let existing: GovernanceProposal = decode(&bytes)?;
            if existing.status != proposal.status {
                batch.delete(&chainidx_keys::gov_proposal_status_index(
                    proposal.contract,
                    existing.status.as_key_segment(),
                    proposal.id,
                ));
            }
        }
        batch.put(&chainidx_keys::gov_proposal(proposal.contract, proposal.id), &encode(proposal)?);
        batch.put(
            &chainidx_keys::gov_proposal_status_index(proposal.contract, proposal.status.as_key_segment(), proposal.id),
            &[],
        );
        batch.commit()
    }

    fn update_proposal_status(&self, contract: Address, id: u64, status: ProposalStatus, executed_at: Option<u64>) -> Result<()> {
        let bytes = self.backend.get(&chainidx_keys::gov_proposal(contract, id))?.ok_or(Error::NotFound)?;
        let mut proposal: GovernanceProposal = decode(&bytes)?;
        let old_status = proposal.status;
        proposal.status = status;
        proposal.executed_at = executed_at;

        let mut batch = self.backend.new_batch();
        batch.delete(&chainidx_keys::gov_proposal_status_index(contract, old_status.as_key_segment(), id));
        batch.put(&chainidx_keys::gov_proposal(contract, id), &encode(&proposal)?);
        batch.put(&chainidx_keys::gov_proposal_status_index(contract, status.as_key_segment(), id), &[]);
        batch.commit()
    }

    fn set_vote(&self, vote: &ProposalVote) -> Result<()> {
        self.backend
            .put(&chainidx_keys::gov_vote(vote.contract, vote.id, vote.voter), &encode(vote)?)
    }

    fn set_deposit_mint_proposal(&self, proposal: &DepositMintProposal) -> Result<()> {
        self.backend
            .put(&chainidx_keys::deposit_mint_proposal(proposal.contract, proposal.id), &encode(proposal)?)
    }
}

impl ContractVerificationReader for EventsStore {
    fn is_verified(&self, address: Address, token: &chainidx_types::CancelToken) -> Result<bool> {
        token.check()?;
        Ok(self.backend.has(&chainidx_keys::verification(address))?)
    }
}

impl ContractVerificationWriter for EventsStore {
    fn set_verified(&self, address: Address, verified: bool) -> Result<()> {
        if verified {
            self.backend.put(&chainidx_keys::verification(address), &[])
        } else {
            self.backend.delete(&chainidx_keys::verification(address))
        }
    }
}

impl AbiReader for EventsStore {
    fn get_abi(&self, address: Address, token: &chainidx_types::CancelToken) -> Result<String> {
        token.check()?;
        let bytes = self.backend.get(&chainidx_keys::abi(address))?.ok_or(Error::NotFound)?;
        String::from_utf8(bytes).map_err(|_| Error::InvalidData("stored ABI is not valid UTF-8".to_string()))
    }
}

impl AbiWriter for EventsStore {
    fn set_abi(&self, address: Address, abi_json: &str) -> Result<()> {
        self.backend.put(&chainidx_keys::abi(address), abi_json.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, Bytes, address};
    use chainidx_backend::{BackendConfig, RocksBackend};
    use chainidx_types::CancelToken;

    fn open_store() -> (tempfile::TempDir, EventsStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = BackendConfig {
            path: dir.path().to_path_buf(),
            ..BackendConfig::default()
        };
        let backend: Arc<dyn Backend> = Arc::new(RocksBackend::open(&config).unwrap());
        (dir, EventsStore::new(backend))
    }

    fn proposal(contract: Address, id: u64, status: ProposalStatus) -> GovernanceProposal {
        GovernanceProposal {
            contract,
            id,
            proposer: address!("0000000000000000000000000000000000000a"),
            action: chainidx_types::ProposalAction::GenericCall,
            call_data: Bytes::new(),
            member_version: 1,
            required_approvals: 3,
            current_approvals: 0,
            current_rejections: 0,
            status,
            created_at: 1000,
            executed_at: None,
            block_number: 1,
            tx_hash: B256::ZERO,
        }
    }

    #[test]
    fn e5_proposal_status_transition_invariant() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let contract = address!("0000000000000000000000000000000000000b");
        store.set_proposal(&proposal(contract, 1, ProposalStatus::Voting)).unwrap();

        store.update_proposal_status(contract, 1, ProposalStatus::Executed, Some(2000)).unwrap();

        assert!(store.get_proposals(contract, ProposalStatus::Voting, 10, 0, &token).unwrap().is_empty());
        let executed = store.get_proposals(contract, ProposalStatus::Executed, 10, 0, &token).unwrap();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].executed_at, Some(2000));
    }

    #[test]
    fn minter_config_updates_active_set() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let actor = address!("0000000000000000000000000000000000000c");
        store
            .set_minter_config_event(&MinterConfigEvent {
                actor,
                block_number: 1,
                is_minter: true,
                tx_hash: B256::ZERO,
            })
            .unwrap();
        assert!(store.is_minter(actor, &token).unwrap());

        store
            .set_minter_config_event(&MinterConfigEvent {
                actor,
                block_number: 2,
                is_minter: false,
                tx_hash: B256::ZERO,
            })
            .unwrap();
        assert!(!store.is_minter(actor, &token).unwrap());

        let history = store.get_minter_config_history(actor, 0, 10, 10, 0, &token).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn total_supply_rejects_negative_delta() {
        let (_dir, store) = open_store();
        let err = store.apply_total_supply_delta(SignedU256::negative(U256::from(1u64))).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn abi_and_verification_round_trip() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let address = address!("0000000000000000000000000000000000000d");
        assert!(matches!(store.get_abi(address, &token), Err(Error::NotFound)));

        store.set_abi(address, "[]").unwrap();
        assert_eq!(store.get_abi(address, &token).unwrap(), "[]");

        assert!(!store.is_verified(address, &token).unwrap());
        store.set_verified(address, true).unwrap();
        assert!(store.is_verified(address, &token).unwrap());
        store.set_verified(address, false).unwrap();
        assert!(!store.is_verified(address, &token).unwrap());
    }
}
