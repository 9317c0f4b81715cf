mod article;
mod session;
mod interaction;
mod vector;

pub use article::{Article, Category};
pub use session::{ChatMessage, MessageRole, Session};
pub use interaction::InteractionLog;
pub use vector::{VectorEntry, EMBEDDING_DIMENSION};
