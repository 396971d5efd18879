mod money;
mod request;
mod transaction;

pub use money::*;
pub use request::*;
pub use transaction::*;
