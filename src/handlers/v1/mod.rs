//! V1 API handlers.

mod chat;
mod conversations;
mod models;

pub use chat::chat_completion;
pub use conversations::{create_conversation, get_conversation, send_message};
pub use models::list_models;
