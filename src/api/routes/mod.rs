pub mod chat;
pub mod trip;
