//! Search shortcut detection
//!
//! Messages that read like a lookup ("find Maria", "show me the Jensen
//! lead") skip the LLM and go straight to `global_search`. Matching is on
//! whole words so that "forget" or "together" do not trigger it.

/// Phrases that mark a message as a search request
pub const SEARCH_TERMS: [&str; 5] = ["find", "search", "look for", "get", "show me"];

/// Words dropped when turning a message into a search term
const FILLER_WORDS: &[&str] = &[
    "a", "all", "an", "any", "about", "can", "client", "clients", "could", "details", "for",
    "from", "info", "information", "lead", "leads", "look", "me", "my", "of", "please", "record",
    "records", "show", "the", "with", "you",
];

fn tokenize(message: &str) -> Vec<String> {
    // Phone keyboards type curly apostrophes
    message
        .replace(['\u{2018}', '\u{2019}'], "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '@' || c == '.' || c == '-' || c == '\''))
        .map(|w| w.trim_matches(|c: char| c == '.' || c == '\'' || c == '-'))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

fn contains_phrase(tokens: &[String], phrase: &str) -> bool {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.is_empty() || words.len() > tokens.len() {
        return false;
    }
    tokens
        .windows(words.len())
        .any(|window| window.iter().zip(&words).all(|(t, w)| t == w))
}

/// Whether the message asks for a lookup
pub fn is_search_request(message: &str) -> bool {
    let tokens = tokenize(message);
    SEARCH_TERMS.iter().any(|term| contains_phrase(&tokens, term))
}

/// Strip search verbs and filler words, leaving the thing to look up
///
/// Returns `None` when nothing searchable remains.
pub fn clean_query(message: &str) -> Option<String> {
    let verbs: Vec<&str> = SEARCH_TERMS
        .iter()
        .flat_map(|t| t.split_whitespace())
        .collect();

    let kept: Vec<String> = tokenize(message)
        .into_iter()
        .filter(|w| !verbs.contains(&w.as_str()) && !FILLER_WORDS.contains(&w.as_str()))
        .map(|w| w.trim_end_matches("'s").to_string())
        .filter(|w| !w.is_empty())
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_search_verbs() {
        assert!(is_search_request("Find Maria"));
        assert!(is_search_request("can you SEARCH for the Jensen wedding"));
        assert!(is_search_request("Please look for simon@example.com"));
        assert!(is_search_request("show me leads from June"));
        assert!(is_search_request("get the Miller record"));
    }

    #[test]
    fn test_ignores_words_containing_verbs() {
        assert!(!is_search_request("Don't forget the deposit"));
        assert!(!is_search_request("Put the album together"));
        assert!(!is_search_request("Look at this invoice"));
        assert!(!is_search_request("show the calendar"));
    }

    #[test]
    fn test_clean_query_keeps_subject() {
        assert_eq!(clean_query("Find Maria").as_deref(), Some("maria"));
        assert_eq!(
            clean_query("Can you search for the Jensen lead?").as_deref(),
            Some("jensen")
        );
        assert_eq!(
            clean_query("look for simon@example.com").as_deref(),
            Some("simon@example.com")
        );
        assert_eq!(clean_query("show me Maria's details").as_deref(), Some("maria"));
        assert_eq!(
            clean_query("show me Maria\u{2019}s details").as_deref(),
            Some("maria")
        );
        assert_eq!(clean_query("find \u{2018}Jensen\u{2019}").as_deref(), Some("jensen"));
    }

    #[test]
    fn test_clean_query_empty_when_only_verbs() {
        assert_eq!(clean_query("find"), None);
        assert_eq!(clean_query("show me all the leads"), None);
    }
}
