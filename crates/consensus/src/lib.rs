//! WBFT consensus audit trail (§4.7): per-block extras, per-epoch validator
//! sets, and per-`(validator, block)` signing activity.
//!
//! The writer is expected to call [`ConsensusStore::set_validator_activity`]
//! for every validator in the active set at a given height, whether or not
//! it signed — the activity table is the only record of misses, and
//! [`ConsensusStore::get_all_validators_signing_stats`] has no other way to
//! learn who was supposed to sign.

use std::sync::Arc;

use alloy_primitives::Address;

use chainidx_backend::Backend;
use chainidx_codec::{decode, decode_u64, encode, encode_u64};
use chainidx_types::{
    BlockSigners, CancelToken, EpochInfo, Error, Result, ValidatorSigningActivity, ValidatorSigningStats, WbftBlockExtra,
    WbftReader, WbftWriter,
};

/// WBFT audit-trail storage, backed by one ordered key/value handle.
pub struct ConsensusStore {
    backend: Arc<dyn Backend>,
}

impl ConsensusStore {
    /// Wraps `backend` in a [`ConsensusStore`].
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    fn latest_epoch_or_zero(&self) -> Result<u64> {
        match self.backend.get(&chainidx_keys::wbft_latest_epoch())? {
            Some(bytes) => decode_u64(&bytes),
            None => Ok(0),
        }
    }

    fn signers(&self, prefix: Vec<u8>, token: &CancelToken) -> Result<Vec<Address>> {
        let upper = chainidx_backend::prefix_upper_bound(&prefix);
        let mut signers = Vec::new();
        for item in self.backend.new_iterator(&prefix, &upper)? {
            token.check()?;
            let (key, _) = item?;
            let Some(segment) = key.rsplit(|&b| b == b'/').next() else {
                continue;
            };
            let Some(address) = parse_address_segment(segment) else {
                continue;
            };
            signers.push(address);
        }
        Ok(signers)
    }
}

fn parse_address_segment(segment: &[u8]) -> Option<Address> {
    let text = std::str::from_utf8(segment).ok()?;
    let bytes = alloy_primitives::hex::decode(text).ok()?;
    Address::try_from(bytes.as_slice()).ok()
}

impl WbftReader for ConsensusStore {
    fn get_wbft_block_extra(&self, height: u64, token: &CancelToken) -> Result<WbftBlockExtra> {
        token.check()?;
        let bytes = self.backend.get(&chainidx_keys::wbft_extra(height))?.ok_or(Error::NotFound)?;
        decode(&bytes)
    }

    fn get_epoch_info(&self, epoch: u64, token: &CancelToken) -> Result<EpochInfo> {
        token.check()?;
        let bytes = self.backend.get(&chainidx_keys::wbft_epoch(epoch))?.ok_or(Error::NotFound)?;
        decode(&bytes)
    }

    fn get_latest_epoch(&self, token: &CancelToken) -> Result<u64> {
        token.check()?;
        self.latest_epoch_or_zero()
    }

    fn get_block_signers(&self, height: u64, token: &CancelToken) -> Result<BlockSigners> {
        token.check()?;
        Ok(BlockSigners {
            prepare: self.signers(chainidx_keys::wbft_prepare_signers_prefix(height), token)?,
            commit: self.signers(chainidx_keys::wbft_commit_signers_prefix(height), token)?,
        })
    }

    fn get_validator_activity(&self, validator: Address, height: u64, token: &CancelToken) -> Result<ValidatorSigningActivity> {
        token.check()?;
        let bytes = self
            .backend
            .get(&chainidx_keys::wbft_activity(validator, height))?
            .ok_or(Error::NotFound)?;
        decode(&bytes)
    }

    fn get_validator_signing_stats(&self, validator: Address, from: u64, to: u64, token: &CancelToken) -> Result<ValidatorSigningStats> {
        token.check()?;
        if from > to {
            return Err(Error::InvalidArgument(format!("from ({from}) > to ({to})")));
        }
        let prefix = chainidx_keys::wbft_activity_prefix(validator);
        let upper = chainidx_backend::prefix_upper_bound(&prefix);
        let mut stats = ValidatorSigningStats {
            from_block: from,
            to_block: to,
            ..ValidatorSigningStats::default()
        };
        for item in self.backend.new_iterator(&prefix, &upper)? {
            token.check()?;
            let (_, value) = item?;
            let activity: ValidatorSigningActivity = decode(&value)?;
            if activity.block_number < from || activity.block_number > to {
                continue;
            }
            if activity.signed_prepare {
                stats.prepare_signed += 1;
            } else {
                stats.prepare_missed += 1;
            }
            if activity.signed_commit {
                stats.commit_signed += 1;
            } else {
                stats.commit_missed += 1;
            }
        }
        Ok(stats)
    }

    fn get_all_validators_signing_stats(
        &self,
        from: u64,
        to: u64,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<(Address, ValidatorSigningStats)>> {
        token.check()?;
        if from > to {
            return Err(Error::InvalidArgument(format!("from ({from}) > to ({to})")));
        }
        // Scan the entire activity table directly rather than deriving the
        // validator set from epoch indirection: the epoch active during
        // [from, to] is not necessarily the store's current epoch, and an
        // in-range scan may not happen to include that epoch's boundary
        // block.
        let prefix = chainidx_keys::wbft_activity_table_prefix();
        let upper = chainidx_backend::prefix_upper_bound(&prefix);
        let mut tally: std::collections::BTreeMap<Address, ValidatorSigningStats> = std::collections::BTreeMap::new();
        for item in self.backend.new_iterator(&prefix, &upper)? {
            token.check()?;
            let (_, value) = item?;
            let activity: ValidatorSigningActivity = decode(&value)?;
            if activity.block_number < from || activity.block_number > to {
                continue;
            }
            let stats = tally.entry(activity.validator).or_insert_with(|| ValidatorSigningStats {
                from_block: from,
                to_block: to,
                ..ValidatorSigningStats::default()
            });
            if activity.signed_prepare {
                stats.prepare_signed += 1;
            } else {
                stats.prepare_missed += 1;
            }
            if activity.signed_commit {
                stats.commit_signed += 1;
            } else {
                stats.commit_missed += 1;
            }
        }
        Ok(chainidx_types::paginate(tally.into_iter(), offset, limit))
    }
}

impl WbftWriter for ConsensusStore {
    fn set_wbft_block_extra(&self, extra: &WbftBlockExtra) -> Result<()> {
        let mut batch = self.backend.new_batch();
        batch.put(&chainidx_keys::wbft_extra(extra.block_number), &encode(extra)?);
        if let Some(epoch_info) = &extra.epoch_info {
            if !epoch_info.validator_indices_are_valid() {
                return Err(Error::InvalidData(format!(
                    "epoch {} carries a validator index outside its candidate table",
                    epoch_info.epoch
                )));
            }
            batch.put(&chainidx_keys::wbft_epoch(epoch_info.epoch), &encode(epoch_info)?);
            if epoch_info.epoch > self.latest_epoch_or_zero()? {
                batch.put(&chainidx_keys::wbft_latest_epoch(), &encode_u64(epoch_info.epoch));
            }
        }
        batch.commit()
    }

    fn set_validator_activity(&self, activity: &ValidatorSigningActivity) -> Result<()> {
        let mut batch = self.backend.new_batch();
        batch.put(
            &chainidx_keys::wbft_activity(activity.validator, activity.block_number),
            &encode(activity)?,
        );
        if activity.signed_prepare {
            batch.put(&chainidx_keys::wbft_prepare_signer(activity.block_number, activity.validator), &[]);
        }
        if activity.signed_commit {
            batch.put(&chainidx_keys::wbft_commit_signer(activity.block_number, activity.validator), &[]);
        }
        batch.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, Bytes, U256, address};
    use chainidx_backend::{BackendConfig, RocksBackend};
    use chainidx_types::ValidatorCandidate;

    fn open_store() -> (tempfile::TempDir, ConsensusStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = BackendConfig {
            path: dir.path().to_path_buf(),
            ..BackendConfig::default()
        };
        let backend: Arc<dyn Backend> = Arc::new(RocksBackend::open(&config).unwrap());
        (dir, ConsensusStore::new(backend))
    }

    fn extra(height: u64, epoch_info: Option<EpochInfo>) -> WbftBlockExtra {
        WbftBlockExtra {
            block_number: height,
            block_hash: B256::repeat_byte(height as u8),
            randao_reveal: Bytes::new(),
            prev_round: 0,
            round: 1,
            prev_prepared_seal: None,
            prev_committed_seal: None,
            prepared_seal: None,
            committed_seal: None,
            gas_tip: U256::ZERO,
            epoch_info,
            timestamp: 1000,
        }
    }

    #[test]
    fn epoch_boundary_invariant_advances_latest_epoch() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let candidates = vec![
            ValidatorCandidate {
                address: address!("0000000000000000000000000000000000000a"),
                diligence_score: 10,
            },
        ];
        let epoch_info = EpochInfo {
            epoch: 5,
            block_number: 100,
            candidates,
            validator_indices: vec![0],
            bls_public_keys: vec![Bytes::new()],
        };
        store.set_wbft_block_extra(&extra(100, Some(epoch_info.clone()))).unwrap();

        assert_eq!(store.get_latest_epoch(&token).unwrap(), 5);
        assert_eq!(store.get_epoch_info(5, &token).unwrap(), epoch_info);

        // An older epoch boundary must not regress latest-epoch.
        let older = EpochInfo { epoch: 3, ..epoch_info };
        store.set_wbft_block_extra(&extra(50, Some(older))).unwrap();
        assert_eq!(store.get_latest_epoch(&token).unwrap(), 5);
    }

    #[test]
    fn invalid_validator_index_is_rejected() {
        let (_dir, store) = open_store();
        let epoch_info = EpochInfo {
            epoch: 1,
            block_number: 1,
            candidates: vec![],
            validator_indices: vec![0],
            bls_public_keys: vec![],
        };
        let err = store.set_wbft_block_extra(&extra(1, Some(epoch_info))).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn e4_block_signers_and_all_validator_stats() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let v1 = address!("0000000000000000000000000000000000000a");
        let v2 = address!("0000000000000000000000000000000000000b");
        let v3 = address!("0000000000000000000000000000000000000c");
        let v4 = address!("0000000000000000000000000000000000000d");
        let candidates = vec![v1, v2, v3, v4]
            .into_iter()
            .map(|address| ValidatorCandidate { address, diligence_score: 1 })
            .collect::<Vec<_>>();
        let epoch_info = EpochInfo {
            epoch: 1,
            block_number: 100,
            candidates,
            validator_indices: vec![0, 1, 2, 3],
            bls_public_keys: vec![Bytes::new(); 4],
        };
        store.set_wbft_block_extra(&extra(100, Some(epoch_info))).unwrap();

        for (index, (validator, commit)) in [(v1, true), (v2, false), (v3, true), (v4, false)].into_iter().enumerate() {
            store
                .set_validator_activity(&ValidatorSigningActivity {
                    validator,
                    block_number: 100,
                    signed_prepare: commit,
                    signed_commit: commit,
                    validator_index: index as u32,
                    block_hash: B256::repeat_byte(100),
                    round: 1,
                    timestamp: 1000,
                })
                .unwrap();
        }

        let signers = store.get_block_signers(100, &token).unwrap();
        assert_eq!(signers.commit.len(), 2);
        assert!(signers.commit.contains(&v1));
        assert!(signers.commit.contains(&v3));

        let all_stats = store.get_all_validators_signing_stats(100, 100, 10, 0, &token).unwrap();
        let misses: Vec<_> = all_stats
            .iter()
            .filter(|(addr, _)| *addr == v2 || *addr == v4)
            .collect();
        assert_eq!(misses.len(), 2);
        assert!(misses.iter().all(|(_, stats)| stats.commit_missed == 1));
    }

    #[test]
    fn all_validator_stats_reads_activity_not_current_epoch() {
        // A query range entirely inside an old epoch, not touching that
        // epoch's boundary block, must still report that epoch's
        // validators — not whatever epoch is current by the time of the
        // query.
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let old_v1 = address!("0000000000000000000000000000000000000a");
        let old_v2 = address!("0000000000000000000000000000000000000b");
        let old_epoch = EpochInfo {
            epoch: 1,
            block_number: 100,
            candidates: vec![old_v1, old_v2]
                .into_iter()
                .map(|address| ValidatorCandidate { address, diligence_score: 1 })
                .collect(),
            validator_indices: vec![0, 1],
            bls_public_keys: vec![Bytes::new(); 2],
        };
        store.set_wbft_block_extra(&extra(100, Some(old_epoch))).unwrap();
        for (validator, commit) in [(old_v1, true), (old_v2, false)] {
            store
                .set_validator_activity(&ValidatorSigningActivity {
                    validator,
                    block_number: 103,
                    signed_prepare: commit,
                    signed_commit: commit,
                    validator_index: 0,
                    block_hash: B256::repeat_byte(103),
                    round: 1,
                    timestamp: 1000,
                })
                .unwrap();
        }

        let new_v1 = address!("00000000000000000000000000000000000005");
        let new_epoch = EpochInfo {
            epoch: 5,
            block_number: 500,
            candidates: vec![ValidatorCandidate { address: new_v1, diligence_score: 1 }],
            validator_indices: vec![0],
            bls_public_keys: vec![Bytes::new()],
        };
        store.set_wbft_block_extra(&extra(500, Some(new_epoch))).unwrap();
        assert_eq!(store.get_latest_epoch(&token).unwrap(), 5);

        // Range [102, 103] covers neither epoch's boundary block.
        let stats = store.get_all_validators_signing_stats(102, 103, 10, 0, &token).unwrap();
        let addrs: Vec<_> = stats.iter().map(|(addr, _)| *addr).collect();
        assert!(addrs.contains(&old_v1));
        assert!(addrs.contains(&old_v2));
        assert!(!addrs.contains(&new_v1));
    }
}
