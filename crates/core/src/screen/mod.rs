pub mod assemble;
pub mod breadth;
pub mod refresh;
pub mod zones;

pub use assemble::{assemble_snapshot, RejectReason, Rejection, SnapshotOutcome, MIN_VALID_BARS};
pub use refresh::{refresh, InstrumentSeries, Screen, ZoneTransitions};
