//! Content hashing using FxHash.
//!
//! Used to tell whether a reloaded `tiapp.xml` actually changed. FxHash is
//! fast and deterministic within a process, which is all this needs.
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let h = hash::compute(content.as_bytes()); // -> u64
//! ```

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}
