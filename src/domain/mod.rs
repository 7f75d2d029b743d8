//! Domain types: table row structs and role levels.

pub mod records;
pub mod roles;

pub use records::{Booking, Seat, User, Zone, ZoneMember};
pub use roles::{AccountType, ZoneRole};
