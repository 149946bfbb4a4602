pub mod messages;
pub mod health;
pub mod ready;
pub mod diagnostics;
pub mod error;

pub use messages::*;
pub use health::*;
pub use ready::*;
pub use diagnostics::*;
pub use error::*;
