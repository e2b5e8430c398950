//! Process memory sampling

use std::fmt::Debug;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Source of the current process memory usage.
///
/// Implementations return `None` when the host offers no usable API. Callers
/// must keep "unavailable" distinct from a measured zero.
pub trait MemoryProbe: Send + Sync + Debug {
    /// Current memory usage in bytes, if observable.
    fn used_bytes(&self) -> Option<u64>;

    /// Current memory usage in megabytes, if observable.
    fn used_mb(&self) -> Option<f64> {
        self.used_bytes().map(|bytes| bytes as f64 / BYTES_PER_MB)
    }
}

/// Reads resident memory of the current process.
///
/// Uses `/proc/self/statm` on Linux; reports unavailable elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemoryProbe;

impl MemoryProbe for ProcessMemoryProbe {
    #[cfg(target_os = "linux")]
    fn used_bytes(&self) -> Option<u64> {
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        parse_statm_resident(&statm, 4096)
    }

    #[cfg(not(target_os = "linux"))]
    fn used_bytes(&self) -> Option<u64> {
        None
    }
}

/// A probe for hosts without a memory API.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMemoryProbe;

impl MemoryProbe for NoMemoryProbe {
    fn used_bytes(&self) -> Option<u64> {
        None
    }
}

/// Parse the resident page count (second field) of a statm line.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_statm_resident(statm: &str, page_size: u64) -> Option<u64> {
    let pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    Some(pages * page_size)
}
