pub mod config;
pub mod error;
pub mod message;
pub mod services;

pub use config::ClientConfig;
pub use error::ClientError;
pub use message::{ChatMessageRequest, ChatMessageResponse, Message, Sender};
pub use services::chat_api::ChatClient;
pub use services::conversation::Conversation;
