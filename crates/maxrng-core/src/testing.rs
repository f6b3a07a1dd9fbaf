//! Mock sources and providers shared by unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, RngError};
use crate::hash::{HashContext, HashProvider};
use crate::source::{EntropySource, SourceCategory, SourceId, SourceInfo};

fn mock_info(id: SourceId) -> SourceInfo {
    SourceInfo {
        id,
        description: "mock source",
        physics: "deterministic test data",
        category: SourceCategory::System,
        slow: false,
    }
}

/// Always yields the same bytes.
pub struct FixedSource {
    info: SourceInfo,
    bytes: Vec<u8>,
}

impl FixedSource {
    pub fn new(id: SourceId, bytes: Vec<u8>) -> Self {
        Self {
            info: mock_info(id),
            bytes,
        }
    }
}

impl EntropySource for FixedSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }
    fn is_available(&self) -> bool {
        true
    }
    fn produce(&self) -> Option<Vec<u8>> {
        Some(self.bytes.clone())
    }
}

/// Yields a fresh value every call.
pub struct CountingSource {
    info: SourceInfo,
    next: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn new(id: SourceId) -> Self {
        Self {
            info: mock_info(id),
            next: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle on the number of `produce` calls so far.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.next)
    }
}

impl EntropySource for CountingSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }
    fn is_available(&self) -> bool {
        true
    }
    fn produce(&self) -> Option<Vec<u8>> {
        let n = self.next.fetch_add(1, Ordering::SeqCst) as u64;
        Some(n.to_le_bytes().to_vec())
    }
}

/// Never yields anything.
pub struct SilentSource {
    info: SourceInfo,
}

impl SilentSource {
    pub fn new(id: SourceId) -> Self {
        Self { info: mock_info(id) }
    }
}

impl EntropySource for SilentSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }
    fn is_available(&self) -> bool {
        false
    }
    fn produce(&self) -> Option<Vec<u8>> {
        None
    }
}

/// Panics on every produce.
pub struct PanickingSource {
    info: SourceInfo,
}

impl PanickingSource {
    pub fn new(id: SourceId) -> Self {
        Self { info: mock_info(id) }
    }
}

impl EntropySource for PanickingSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }
    fn is_available(&self) -> bool {
        true
    }
    fn produce(&self) -> Option<Vec<u8>> {
        panic!("mock source failure")
    }
}

/// Provider whose contexts fail on the first update.
pub struct FailingProvider {
    pub digest_len: usize,
}

struct FailingContext;

impl HashContext for FailingContext {
    fn update(&mut self, _data: &[u8]) -> Result<()> {
        Err(RngError::PrimitiveFailure("mock update"))
    }
    fn finalize_into(self: Box<Self>, _out: &mut [u8]) -> Result<()> {
        Err(RngError::PrimitiveFailure("mock finalize"))
    }
}

impl HashProvider for FailingProvider {
    fn digest_len(&self) -> usize {
        self.digest_len
    }
    fn hash(&self) -> Result<Box<dyn HashContext>> {
        Ok(Box::new(FailingContext))
    }
    fn hmac(&self, _key: &[u8]) -> Result<Box<dyn HashContext>> {
        Ok(Box::new(FailingContext))
    }
}
