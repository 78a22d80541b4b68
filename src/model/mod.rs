/// Segments and timelines produced by the allocator.
pub mod segment;
/// Input sources.
pub mod source;
