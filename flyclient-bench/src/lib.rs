//! FlyClient benchmarks with mimalloc as the global allocator.
//!
//! Every bench target links this crate so that accumulator growth and
//! proof assembly, which allocate many small nodes and weights, are
//! measured under the same allocator.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Re-export mimalloc for direct access if needed.
pub use mimalloc;
