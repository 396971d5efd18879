pub mod application;
pub mod cli;
pub mod document;
pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;

pub use application::{AppError, TransactionService};
pub use domain::*;
pub use storage::{SqliteRepository, TransactionRepository};
