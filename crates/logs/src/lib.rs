//! Log storage and the compound address/topic/block filter (§4.5).
//!
//! A log is stored once, in full, at `/data/logs/{h}/{ti}/{li}`. Four
//! secondary indexes (block, address, and up to four topic positions) hold
//! an existence marker only; [`LogStore::get_logs`] resolves candidate
//! positions from whichever index the filter shape selects, then loads and
//! re-filters the full record.

use std::collections::BTreeSet;
use std::sync::Arc;

use alloy_primitives::B256;

use chainidx_backend::Backend;
use chainidx_codec::{decode_log_body, encode_log_body};
use chainidx_types::{CancelToken, Error, Log, LogReader, LogWriter, Result};

/// An existence-marker value. The byte itself carries no meaning; presence
/// of the key is the signal.
const MARKER: &[u8] = &[1];

/// Log storage and filter evaluation, backed by one ordered key/value
/// handle.
pub struct LogStore {
    backend: Arc<dyn Backend>,
}

impl LogStore {
    /// Wraps `backend` in a [`LogStore`].
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    fn latest_height(&self) -> Result<u64> {
        match self.backend.get(&chainidx_keys::latest_height())? {
            Some(bytes) => chainidx_codec::decode_u64(&bytes),
            None => Ok(0),
        }
    }

    /// Scans `[lower, upper)`, parsing each entry's `{h}/{ti}/{li}` suffix
    /// into `positions`, checking `token` once per step.
    fn collect_positions(
        &self,
        lower: &[u8],
        upper: &[u8],
        positions: &mut BTreeSet<(u64, u32, u32)>,
        token: &CancelToken,
    ) -> Result<()> {
        for item in self.backend.new_iterator(lower, upper)? {
            token.check()?;
            let (key, _) = item?;
            if let Some(position) = chainidx_keys::parse_block_tx_log_suffix(&key) {
                positions.insert(position);
            }
        }
        Ok(())
    }

    fn range_bounds_for<F>(from: u64, to: u64, key_at: F) -> (Vec<u8>, Vec<u8>)
    where
        F: Fn(u64) -> Vec<u8>,
    {
        (key_at(from), key_at(to.saturating_add(1)))
    }
}

/// `true` if `log` satisfies every non-wildcard position of `topics`.
fn matches_topics(log: &Log, topics: &[Vec<B256>]) -> bool {
    topics.iter().enumerate().all(|(position, accepted)| {
        if accepted.is_empty() {
            return true;
        }
        match log.topic(position) {
            Some(topic) => accepted.contains(topic),
            None => false,
        }
    })
}

impl LogReader for LogStore {
    fn get_logs(&self, filter: &chainidx_types::LogFilter, token: &CancelToken) -> Result<Vec<Log>> {
        token.check()?;
        let to_block = if filter.to_block == 0 {
            self.latest_height()?
        } else {
            filter.to_block
        };
        if filter.from_block > to_block {
            return Err(Error::InvalidArgument(format!(
                "from_block ({}) > to_block ({to_block})",
                filter.from_block
            )));
        }

        let mut positions = BTreeSet::new();
        let primary_is_address = !filter.addresses.is_empty();
        if primary_is_address {
            for &address in &filter.addresses {
                let (lower, upper) =
                    Self::range_bounds_for(filter.from_block, to_block, |h| chainidx_keys::log_addr_index(address, h, 0, 0));
                self.collect_positions(&lower, &upper, &mut positions, token)?;
            }
        } else if !filter.topic_is_wildcard(0) {
            for &topic in &filter.topics[0] {
                let (lower, upper) = Self::range_bounds_for(filter.from_block, to_block, |h| {
                    chainidx_keys::log_topic_index(0, topic, h, 0, 0)
                });
                self.collect_positions(&lower, &upper, &mut positions, token)?;
            }
        } else {
            let (lower, upper) =
                Self::range_bounds_for(filter.from_block, to_block, |h| chainidx_keys::log_block_index(h, 0, 0));
            self.collect_positions(&lower, &upper, &mut positions, token)?;
        }

        let mut results = Vec::with_capacity(positions.len());
        for (height, tx_index, log_index) in positions {
            token.check()?;
            let Some(bytes) = self.backend.get(&chainidx_keys::log(height, tx_index, log_index))? else {
                continue;
            };
            let log = match decode_log_body(&bytes) {
                Ok(log) => log,
                Err(err) => {
                    tracing::warn!(height, tx_index, log_index, error = %err, "skipping log that failed to decode");
                    continue;
                }
            };
            if !matches_topics(&log, &filter.topics) {
                continue;
            }
            if !primary_is_address && !filter.addresses.is_empty() && !filter.addresses.contains(&log.address) {
                continue;
            }
            results.push(log);
        }
        Ok(results)
    }
}

impl LogWriter for LogStore {
    fn set_log(&self, log: &Log) -> Result<()> {
        self.set_logs(std::slice::from_ref(log))
    }

    fn set_logs(&self, logs: &[Log]) -> Result<()> {
        if logs.is_empty() {
            return Ok(());
        }
        let mut batch = self.backend.new_batch();
        for log in logs {
            let (h, ti, li) = (log.block_number, log.tx_index, log.log_index);
            batch.put(&chainidx_keys::log(h, ti, li), &encode_log_body(log));
            batch.put(&chainidx_keys::log_block_index(h, ti, li), MARKER);
            batch.put(&chainidx_keys::log_addr_index(log.address, h, ti, li), MARKER);
            for (position, topic) in log.topics.iter().take(4).enumerate() {
                batch.put(&chainidx_keys::log_topic_index(position, *topic, h, ti, li), MARKER);
            }
        }
        batch.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, address};
    use chainidx_backend::{BackendConfig, RocksBackend};
    use chainidx_types::LogFilter;

    fn open_store() -> (tempfile::TempDir, LogStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = BackendConfig {
            path: dir.path().to_path_buf(),
            ..BackendConfig::default()
        };
        let backend: Arc<dyn Backend> = Arc::new(RocksBackend::open(&config).unwrap());
        (dir, LogStore::new(backend))
    }

    fn log_at(height: u64, address: alloy_primitives::Address, topics: Vec<B256>) -> Log {
        Log {
            address,
            topics,
            data: Bytes::new(),
            block_number: height,
            tx_index: 0,
            tx_hash: B256::repeat_byte(height as u8),
            log_index: 0,
        }
    }

    #[test]
    fn e2_compound_filter_scenarios() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let addr_a = address!("000000000000000000000000000000000000aa");
        let addr_b = address!("000000000000000000000000000000000000bb");
        let t0 = B256::repeat_byte(0x10);
        let t1 = B256::repeat_byte(0x11);
        let t2 = B256::repeat_byte(0x12);

        let l100 = log_at(100, addr_a, vec![t0, t1]);
        let l101 = log_at(101, addr_a, vec![t0, t2]);
        let l102 = log_at(102, addr_b, vec![t1, t2]);
        store.set_logs(&[l100.clone(), l101.clone(), l102.clone()]).unwrap();

        let by_topic0 = store
            .get_logs(
                &LogFilter {
                    from_block: 100,
                    to_block: 102,
                    addresses: vec![],
                    topics: vec![vec![t0]],
                },
                &token,
            )
            .unwrap();
        assert_eq!(by_topic0.len(), 2);
        assert!(by_topic0.iter().all(|l| l.topics[0] == t0));

        let by_addr_and_topic0 = store
            .get_logs(
                &LogFilter {
                    from_block: 0,
                    to_block: 0,
                    addresses: vec![addr_a],
                    topics: vec![vec![t0]],
                },
                &token,
            )
            .unwrap();
        assert_eq!(by_addr_and_topic0.len(), 2);

        let by_topic1_wildcard_then_topic2 = store
            .get_logs(
                &LogFilter {
                    from_block: 0,
                    to_block: 0,
                    addresses: vec![],
                    topics: vec![vec![], vec![t2]],
                },
                &token,
            )
            .unwrap();
        assert_eq!(by_topic1_wildcard_then_topic2.len(), 2);
        assert!(by_topic1_wildcard_then_topic2.iter().all(|l| l.topics[1] == t2));
    }

    #[test]
    fn log_filter_soundness_property() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let addr = address!("0000000000000000000000000000000000000c");
        let topic = B256::repeat_byte(0x20);
        let log = log_at(50, addr, vec![topic]);
        store.set_log(&log).unwrap();

        let filter = LogFilter {
            from_block: 50,
            to_block: 50,
            addresses: vec![addr],
            topics: vec![vec![topic]],
        };
        let results = store.get_logs(&filter, &token).unwrap();
        assert_eq!(results, vec![log]);

        let miss = LogFilter {
            from_block: 51,
            to_block: 60,
            addresses: vec![addr],
            topics: vec![],
        };
        assert!(store.get_logs(&miss, &token).unwrap().is_empty());
    }

    #[test]
    fn inverted_range_after_latest_resolution_is_input_error() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let filter = LogFilter {
            from_block: 10,
            to_block: 0,
            addresses: vec![],
            topics: vec![],
        };
        // latest height defaults to 0, so from_block(10) > to_block(0).
        assert!(matches!(store.get_logs(&filter, &token), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn soft_corrupt_body_is_skipped_not_fatal() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        // Write a block-index marker with no matching /data/logs/ record.
        let mut batch = store.backend.new_batch();
        batch.put(&chainidx_keys::log_block_index(10, 0, 0), MARKER);
        batch.commit().unwrap();

        let filter = LogFilter {
            from_block: 10,
            to_block: 10,
            addresses: vec![],
            topics: vec![],
        };
        assert!(store.get_logs(&filter, &token).unwrap().is_empty());
    }
}
