pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;

pub use config::Config;
pub use db::{init_db, InitError, InitOptions, Repository};
pub use domain::{AccountType, Booking, Seat, User, Zone, ZoneMember, ZoneRole};
pub use error::AppError;
