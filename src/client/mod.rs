//! Board client: HTTP access to the API plus the local board cache

pub mod api;
pub mod board;

pub use api::{ClientError, HttpInvestmentApi, InvestmentApi};
pub use board::{BoardSync, MoveOutcome, PendingStage, SyncError, SyncEvent};
