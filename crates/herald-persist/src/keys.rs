//! Fixed storage keys, one JSON array per collection.

pub const ARTICLES: &str = "rag_news_articles";
pub const VECTORS: &str = "rag_news_vectors";
pub const SESSIONS: &str = "rag_news_sessions";
pub const LOGS: &str = "rag_news_logs";

pub const ALL: [&str; 4] = [ARTICLES, VECTORS, SESSIONS, LOGS];
