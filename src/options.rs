//! Per-view configuration.

use core::sync::atomic::{AtomicU64, Ordering};

/// Options accepted by every view constructor.
///
/// # Example
///
/// ```
/// use convergent::{OrSet, ViewOptions};
///
/// // A set that forgets nothing it kills (the default)...
/// let strict = OrSet::<String>::new();
/// // ...and one that trades convergence under reordering for memory.
/// let lossy = OrSet::<String>::with_options(ViewOptions::new().no_tombstones(true));
/// # let _ = (strict, lossy);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub(crate) no_tombstones: bool,
    pub(crate) entropy: fn() -> u64,
}

impl ViewOptions {
    /// Default options: tombstones enabled, weak built-in entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            no_tombstones: false,
            entropy: default_entropy,
        }
    }

    /// Disable tombstone tracking.
    ///
    /// Killed tags are then forgotten immediately. This keeps memory
    /// proportional to live state, but a remove delivered before its add can
    /// no longer be remembered, so the late add resurrects the entry. Only
    /// opt in when the transport guarantees causal delivery.
    #[must_use]
    pub fn no_tombstones(mut self, enabled: bool) -> Self {
        self.no_tombstones = enabled;
        self
    }

    /// Replace the randomness source used for Logoot tie-breaking.
    ///
    /// The default is a weak in-process generator; it only has to make
    /// concurrently minted integers unlikely to collide (a site id makes
    /// them distinct with certainty). Inject a fixed source to make
    /// [`List::between`](crate::List::between) deterministic in tests.
    #[must_use]
    pub fn entropy_source(mut self, entropy: fn() -> u64) -> Self {
        self.entropy = entropy;
        self
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak process-wide entropy: a splitmix64 stream over an atomic, stirred
/// with the wall clock where one is available. Not cryptographic — it only
/// breaks ties between concurrent `between` calls.
fn default_entropy() -> u64 {
    static STATE: AtomicU64 = AtomicU64::new(0x9E37_79B9_7F4A_7C15);
    let mut x = STATE.fetch_add(0x9E37_79B9_7F4A_7C15, Ordering::Relaxed);

    #[cfg(feature = "std")]
    {
        x ^= std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .subsec_nanos() as u64;
    }

    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
