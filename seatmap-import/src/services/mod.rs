//! Event roster, layout and dashboard operations
//!
//! Each operation loads the event, mutates the owned copy and saves it once.

pub mod layout;
pub mod roster;
pub mod stats;

pub use layout::{normalize_layout, replace_layout};
pub use roster::{
    add_guest, remove_guest, self_check_in, set_checked_in, update_guest, CheckInOutcome,
    GuestUpdate, NewGuest,
};
pub use stats::{collect_stats, event_stats, EventStats};
