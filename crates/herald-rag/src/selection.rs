use herald_persist::Article;

use crate::templates::SELECTION_PROMPT_TEMPLATE;

/// Decoded relevance-selection reply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Valid article indices in reply order, deduplicated and capped
    pub indices: Vec<usize>,
    /// Tokens that were not an in-range integer
    pub rejected: usize,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Decode a comma-separated list of article indices
///
/// Tokens are trimmed; anything that is not an integer in `0..article_count`
/// counts as rejected. Repeats of an already kept index are skipped silently.
pub fn parse_selection(reply: &str, article_count: usize, max_sources: usize) -> Selection {
    let mut selection = Selection::default();

    for token in reply.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        match token.parse::<usize>() {
            Ok(index) if index < article_count => {
                if selection.indices.len() >= max_sources {
                    continue;
                }
                if !selection.indices.contains(&index) {
                    selection.indices.push(index);
                }
            }
            _ => selection.rejected += 1,
        }
    }

    selection
}

/// Prompt listing every article as `ID: {i} | Title: {title}`
pub fn build_selection_prompt(query: &str, articles: &[Article], max_sources: usize) -> String {
    let headlines = articles
        .iter()
        .enumerate()
        .map(|(i, a)| format!("ID: {} | Title: {}", i, a.title))
        .collect::<Vec<_>>()
        .join("\n");

    SELECTION_PROMPT_TEMPLATE
        .replace("<query>", query)
        .replace("<headlines>", &headlines)
        .replace("<max_sources>", &max_sources.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_valid_indices_in_order() {
        let selection = parse_selection("3, 0,7", 10, 5);
        assert_eq!(selection.indices, vec![3, 0, 7]);
        assert_eq!(selection.rejected, 0);
    }

    #[test]
    fn test_drops_garbage_and_out_of_range() {
        let selection = parse_selection("2, banana, 40, -1, 1.5, 4", 10, 5);
        assert_eq!(selection.indices, vec![2, 4]);
        assert_eq!(selection.rejected, 4);
    }

    #[test]
    fn test_caps_at_max_sources() {
        let selection = parse_selection("0,1,2,3,4,5,6", 10, 5);
        assert_eq!(selection.indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_skips_repeated_indices() {
        let selection = parse_selection("1, 1, 2, 1", 5, 5);
        assert_eq!(selection.indices, vec![1, 2]);
        assert_eq!(selection.rejected, 0);
    }

    #[test]
    fn test_prose_reply_selects_nothing() {
        let selection = parse_selection("I could not find any relevant articles.", 3, 5);
        assert!(selection.is_empty());
        assert_eq!(selection.rejected, 1);

        assert!(parse_selection("", 3, 5).is_empty());
    }

    #[test]
    fn test_prompt_lists_headlines() {
        let articles = vec![
            Article {
                id: "x".into(),
                title: "Rates hold steady".into(),
                content: "c".into(),
                url: "u".into(),
                published_at: "2024-01-01".into(),
                source: "s".into(),
                category: herald_persist::Category::Finance,
            };
            2
        ];
        let prompt = build_selection_prompt("interest rates?", &articles, 5);
        assert!(prompt.contains("Given the user query: \"interest rates?\""));
        assert!(prompt.contains("ID: 0 | Title: Rates hold steady\nID: 1 | Title: Rates hold steady"));
        assert!(prompt.contains("(max 5)"));
    }
}
