//! Backend synchronization port
//!
//! Multi-user/networked sync is out of scope; the engine still runs the
//! collaborator at startup so a real backend can slot in later.

use async_trait::async_trait;
use goaltimer_domain::Result;

/// Trait for synchronizing local data with a backend
#[async_trait]
pub trait SyncService: Send + Sync {
    /// Run one sync pass
    async fn sync(&self) -> Result<()>;
}

/// Sync collaborator that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSyncService;

#[async_trait]
impl SyncService for NoopSyncService {
    async fn sync(&self) -> Result<()> {
        Ok(())
    }
}
