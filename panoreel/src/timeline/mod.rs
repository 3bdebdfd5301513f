/// Static scroll-axis layout.
pub mod layout;
/// Per-frame offsets, visibility, and the load/evict state machine.
pub mod schedule;
