use serde::{Deserialize, Serialize};

/// Width of stored embeddings
pub const EMBEDDING_DIMENSION: usize = 32;

/// Embedding of an article chunk. Stored alongside articles; retrieval does
/// not read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorEntry {
    pub id: String,
    pub article_id: String,
    pub embedding: Vec<f32>,
    pub text: String,
}
