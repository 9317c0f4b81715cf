pub mod models;
pub mod keys;
pub mod backend;
pub mod trait_client;
pub mod kv_client;
pub mod error;

pub use models::{
    Article, Category, ChatMessage, InteractionLog, MessageRole, Session, VectorEntry,
    EMBEDDING_DIMENSION,
};
pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use trait_client::PersistenceClient;
pub use kv_client::KvPersistenceClient;
pub use error::PersistError;
