//! Duration budget allocator: fills a target duration from prioritized source pools.

/// The allocation loop.
pub mod allocator;
/// Soft outcomes and the allocation result.
pub mod diagnostics;
/// Source pools and their priority policy.
pub mod pool;
