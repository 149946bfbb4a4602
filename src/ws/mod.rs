pub mod connctx;
pub mod handler;
pub mod msg_content_handler;
pub mod msg_cursor_handler;
pub mod msg_join_handler;
pub mod msg_ping_handler;
pub mod registry;
