//! Match sessions.
//!
//! - `session`: the `Table` that owns a match and its `TableBuilder`
//! - `schedule`: deferred decisions for automated seats
//! - `snapshot`: public and per-seat replication snapshots

pub mod schedule;
pub mod session;
pub mod snapshot;

pub use schedule::{DecisionScheduler, DecisionTicket, TicketId};
pub use session::{RoundRecord, Table, TableBuilder, TableStatus};
pub use snapshot::{PublicSnapshot, SeatSnapshot, SnapshotError};
