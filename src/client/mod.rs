pub mod caret;
pub mod channel;
pub mod identity;
pub mod session;
