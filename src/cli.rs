use clap::{Parser, Subcommand};

/// Seat booking service.
#[derive(Debug, Parser)]
#[command(name = "seatbook", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create and initialize the database, then exit.
    ///
    /// Re-runs the init scripts from scratch even if the database has already
    /// been initialized.
    InitDb,
}
