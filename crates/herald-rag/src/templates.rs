//! Fixed prompts and user-visible fallback texts.

pub const NO_DOCUMENTS_MESSAGE: &str =
    "No documents have been ingested yet. Please go to the Ingestion panel.";

pub const EMPTY_RESPONSE_FALLBACK: &str = "I'm sorry, I couldn't generate a response.";

pub const ANALYST_SYSTEM_PROMPT: &str = "You are an expert News Analyst. Use the provided context to answer the user query. \
If the context doesn't contain the answer, say you don't know based on the current articles, \
but offer general knowledge if appropriate while clearly stating it's not from the local articles.";

/// Placeholders: `<query>`, `<headlines>`, `<max_sources>`
pub const SELECTION_PROMPT_TEMPLATE: &str = "Given the user query: \"<query>\"
And the following news headlines:
<headlines>

Return ONLY a comma-separated list of IDs for the most relevant articles (max <max_sources>).
Example: 0, 12, 4";

/// Placeholders: `<context>`, `<history>`, `<query>`
pub const GENERATION_PROMPT_TEMPLATE: &str = "Context:
<context>

Chat History:
<history>

User Query: <query>";

/// Placeholders: `<count>`, `<categories>`
pub const INGESTION_PROMPT_TEMPLATE: &str = "Generate <count> diverse news articles as JSON. \
Respond with an object of the form {\"articles\": [...]}.
Each item must have: id (unique string), title, content (min 3 paragraphs), url, publishedAt (ISO date), source, category (one of: <categories>).
Ensure topics are varied: AI breakthroughs, market shifts, climate change, biotech, geopolitical tensions, etc.";
