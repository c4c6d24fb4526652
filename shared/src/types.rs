/// A monotonic simulation step counter. Each participant advances its own
/// tick; the authority's tick drives timer expiry.
pub type Tick = u64;
