//! Collection key cache
//!
//! Many envelopes in a collection share one header, and re-deriving the
//! symmetric key for each of them repeats an ECDH + HKDF round. The cache
//! memoizes the derived key per exact header encoding, trading a bounded
//! amount of memory for keeping asymmetric crypto off the hot path.
//!
//! Identity is byte-for-byte: two structurally different encodings of "the
//! same" locator are distinct cache keys. Only derived symmetric keys are
//! stored, never private keys.

use crate::types::SymmetricKey;
use nanotdf_protocol::{BinarySerialize, Header};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

/// Maximum number of cached collection keys
pub const MAX_CACHED_COLLECTIONS: usize = 500;

/// Result of a cache probe.
///
/// `NoKey` is a normal, inspectable value meaning "not cached" - a miss is
/// never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionKey {
    /// The derived key stored for this header
    Key(SymmetricKey),
    /// No key cached for this header
    NoKey,
}

impl CollectionKey {
    /// Whether a key is present
    pub fn is_cached(&self) -> bool {
        matches!(self, CollectionKey::Key(_))
    }

    /// The cached key, if any
    pub fn key(&self) -> Option<&SymmetricKey> {
        match self {
            CollectionKey::Key(key) => Some(key),
            CollectionKey::NoKey => None,
        }
    }
}

#[derive(Default)]
struct CacheInner {
    keys: HashMap<Vec<u8>, SymmetricKey>,
    // Insertion order of distinct header encodings; front is oldest
    order: VecDeque<Vec<u8>>,
}

/// Bounded map from serialized header bytes to the derived symmetric key.
///
/// Holds at most [`MAX_CACHED_COLLECTIONS`] entries; inserting beyond the
/// bound evicts the single oldest-inserted entry (strict insertion order,
/// not recency of use). Overwriting an existing entry keeps its original
/// insertion slot. Safe to share across threads.
#[derive(Default)]
pub struct CollectionKeyCache {
    inner: Mutex<CacheInner>,
}

impl CollectionKeyCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the derived key for a header, evicting the oldest entry if the
    /// bound is exceeded
    pub fn store(&self, header: &Header, key: SymmetricKey) {
        // A constructed or parsed Header always serializes; there is nothing
        // useful to do with one that does not.
        let Ok(encoded) = header.to_bytes() else {
            return;
        };
        let mut inner = self.lock();
        if inner.keys.insert(encoded.clone(), key).is_none() {
            inner.order.push_back(encoded);
            if inner.order.len() > MAX_CACHED_COLLECTIONS {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.keys.remove(&oldest);
                }
            }
        }
    }

    /// Look up the key for a header
    pub fn get_key(&self, header: &Header) -> CollectionKey {
        let Ok(encoded) = header.to_bytes() else {
            return CollectionKey::NoKey;
        };
        match self.lock().keys.get(&encoded) {
            Some(key) => CollectionKey::Key(key.clone()),
            None => CollectionKey::NoKey,
        }
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        // Cache operations never fail; a poisoned lock still guards
        // structurally consistent data (no operation panics mid-update)
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanotdf_protocol::{
        EccCurve, KeyAgreementMode, PayloadConfig, PolicyInfo, Protocol, ResourceLocator,
        SymmetricCipher,
    };
    use std::sync::Arc;
    use std::thread;

    fn header_for(policy_content: &[u8]) -> Header {
        let kas = ResourceLocator::new(Protocol::Https, b"kas.example.com".to_vec());
        let mode = KeyAgreementMode::new(EccCurve::P256, false);
        let config = PayloadConfig::new(SymmetricCipher::Aes256Gcm96, 0);
        let policy = PolicyInfo::embedded_plaintext(policy_content.to_vec(), vec![0u8; 8]);
        Header::new(kas, mode, config, policy, vec![0x02; 33]).unwrap()
    }

    fn key_of(byte: u8) -> SymmetricKey {
        SymmetricKey::from_bytes(vec![byte; 32])
    }

    #[test]
    fn test_store_then_get() {
        let cache = CollectionKeyCache::new();
        let header = header_for(b"policy-1");

        assert_eq!(cache.get_key(&header), CollectionKey::NoKey);

        cache.store(&header, key_of(0x01));
        assert_eq!(cache.get_key(&header), CollectionKey::Key(key_of(0x01)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_miss_is_a_value() {
        let cache = CollectionKeyCache::new();
        let probe = cache.get_key(&header_for(b"never stored"));
        assert!(!probe.is_cached());
        assert_eq!(probe.key(), None);
    }

    #[test]
    fn test_overwrite_keeps_insertion_slot() {
        let cache = CollectionKeyCache::new();
        let header = header_for(b"policy-1");

        cache.store(&header, key_of(0x01));
        cache.store(&header, key_of(0x02));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_key(&header), CollectionKey::Key(key_of(0x02)));
    }

    #[test]
    fn test_distinct_encodings_are_distinct_keys() {
        let cache = CollectionKeyCache::new();
        let plain = header_for(b"policy-1");
        let with_id = {
            let kas = ResourceLocator::new(Protocol::Https, b"kas.example.com".to_vec())
                .with_identifier(vec![0xAA, 0xBB])
                .unwrap();
            let mode = KeyAgreementMode::new(EccCurve::P256, false);
            let config = PayloadConfig::new(SymmetricCipher::Aes256Gcm96, 0);
            let policy = PolicyInfo::embedded_plaintext(b"policy-1".to_vec(), vec![0u8; 8]);
            Header::new(kas, mode, config, policy, vec![0x02; 33]).unwrap()
        };

        cache.store(&plain, key_of(0x01));
        assert_eq!(cache.get_key(&with_id), CollectionKey::NoKey);
    }

    #[test]
    fn test_bound_evicts_oldest_inserted() {
        let cache = CollectionKeyCache::new();

        let headers: Vec<Header> = (0..=MAX_CACHED_COLLECTIONS)
            .map(|i| header_for(format!("policy-{i}").as_bytes()))
            .collect();

        for (i, header) in headers.iter().enumerate() {
            cache.store(header, key_of((i % 251) as u8));
        }

        // 501 inserts leave exactly 500 entries
        assert_eq!(cache.len(), MAX_CACHED_COLLECTIONS);

        // The single earliest-inserted entry is gone
        assert_eq!(cache.get_key(&headers[0]), CollectionKey::NoKey);

        // Everything else, including the 501st, is retrievable
        for (i, header) in headers.iter().enumerate().skip(1) {
            assert_eq!(
                cache.get_key(header),
                CollectionKey::Key(key_of((i % 251) as u8)),
                "entry {i} should have survived"
            );
        }
    }

    #[test]
    fn test_reads_do_not_affect_eviction_order() {
        let cache = CollectionKeyCache::new();
        let headers: Vec<Header> = (0..MAX_CACHED_COLLECTIONS)
            .map(|i| header_for(format!("policy-{i}").as_bytes()))
            .collect();
        for header in &headers {
            cache.store(header, key_of(0x01));
        }

        // Touch the oldest entry, then insert one more; insertion order
        // still evicts the touched entry
        assert!(cache.get_key(&headers[0]).is_cached());
        cache.store(&header_for(b"one more"), key_of(0x02));
        assert_eq!(cache.get_key(&headers[0]), CollectionKey::NoKey);
        assert!(cache.get_key(&headers[1]).is_cached());
    }

    #[test]
    fn test_concurrent_store_and_get() {
        let cache = Arc::new(CollectionKeyCache::new());
        let num_threads = 4;
        let per_thread = 200;

        let mut handles = Vec::new();
        for t in 0..num_threads {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..per_thread {
                    let header = header_for(format!("t{t}-p{i}").as_bytes());
                    cache.store(&header, key_of((i % 251) as u8));
                    // Interleave reads; a concurrent eviction may have
                    // already dropped the entry, which is fine
                    let _ = cache.get_key(&header);
                    assert!(cache.len() <= MAX_CACHED_COLLECTIONS);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // 800 distinct headers through a 500-entry cache: bound holds
        assert_eq!(cache.len(), MAX_CACHED_COLLECTIONS);
    }
}
