use herald_persist::{Article, ChatMessage};

use crate::templates::GENERATION_PROMPT_TEMPLATE;

const SOURCE_SEPARATOR: &str = "\n\n---\n\n";

/// Grounding block for the selected articles
pub fn build_grounding_context(articles: &[Article]) -> String {
    articles
        .iter()
        .map(|a| {
            format!(
                "Source: {} ({})\nTitle: {}\nContent: {}",
                a.source, a.published_at, a.title, a.content
            )
        })
        .collect::<Vec<_>>()
        .join(SOURCE_SEPARATOR)
}

/// `{role}: {content}` per line
pub fn render_history(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_generation_prompt(context: &str, history: &str, query: &str) -> String {
    GENERATION_PROMPT_TEMPLATE
        .replace("<context>", context)
        .replace("<history>", history)
        .replace("<query>", query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_persist::Category;

    fn article(source: &str, title: &str) -> Article {
        Article {
            id: title.to_lowercase(),
            title: title.to_string(),
            content: format!("{} body", title),
            url: String::new(),
            published_at: "2024-06-01".to_string(),
            source: source.to_string(),
            category: Category::Science,
        }
    }

    #[test]
    fn test_grounding_context_format() {
        let context = build_grounding_context(&[article("Nature", "Fusion"), article("AP", "Comet")]);
        assert_eq!(
            context,
            "Source: Nature (2024-06-01)\nTitle: Fusion\nContent: Fusion body\n\n---\n\nSource: AP (2024-06-01)\nTitle: Comet\nContent: Comet body"
        );
        assert_eq!(build_grounding_context(&[]), "");
    }

    #[test]
    fn test_history_rendering() {
        let history = vec![
            ChatMessage::user("what about fusion?", 1),
            ChatMessage::assistant("It is progressing.", 2),
        ];
        assert_eq!(
            render_history(&history),
            "user: what about fusion?\nassistant: It is progressing."
        );
    }

    #[test]
    fn test_generation_prompt_sections() {
        let prompt = build_generation_prompt("CTX", "user: hi", "Why?");
        assert_eq!(prompt, "Context:\nCTX\n\nChat History:\nuser: hi\n\nUser Query: Why?");
    }
}
