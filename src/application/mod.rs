// Application layer - use cases over a TransactionRepository.
// Every client (CLI, tests, an HTTP layer) goes through TransactionService.

pub mod error;
pub mod invoice;
pub mod payment;
pub mod reporting;
pub mod service;

pub use error::*;
pub use invoice::*;
pub use payment::*;
pub use reporting::*;
pub use service::*;
