use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use pncp::domain::PurchaseKey;
use pncp::errors::{PncpError, PncpResult};
use pncp::services::ItemCountSource;

/// Reports the same item count for every purchase and counts the calls
pub struct FixedItemCount {
    count: u32,
    calls: AtomicUsize,
}

impl FixedItemCount {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemCountSource for FixedItemCount {
    async fn fetch_item_count(&self, _key: &PurchaseKey) -> PncpResult<u32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.count)
    }
}

pub struct UnavailableItemCount;

#[async_trait]
impl ItemCountSource for UnavailableItemCount {
    async fn fetch_item_count(&self, _key: &PurchaseKey) -> PncpResult<u32> {
        Err(PncpError::UpstreamUnavailable(
            "connection refused".to_string(),
        ))
    }
}
