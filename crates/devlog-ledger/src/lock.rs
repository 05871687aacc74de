use crate::paths::DevlogPaths;
use devlog_store::LockGuard;

/// Exclusive store lock backed by `<root>/LOCK`.
/// Held around read-modify-write of the usage store. Released on drop.
pub struct StoreLock {
    _guard: LockGuard,
}

impl StoreLock {
    /// Acquire the lock, waiting for another invocation to release it.
    pub fn acquire(paths: &DevlogPaths) -> anyhow::Result<Self> {
        let guard = devlog_store::lock_file(&paths.lock_file).map_err(|e| {
            anyhow::anyhow!("cannot lock store {}: {e}", paths.lock_file.display())
        })?;
        Ok(Self { _guard: guard })
    }
}
