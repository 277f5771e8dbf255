//! Client-side filtering shared by the source adapters.

/// Candidates requested per wanted paper when a keyword filter is active
pub const KEYWORD_OVERFETCH: usize = 10;

/// Candidates requested per wanted paper without a keyword filter
pub const PLAIN_OVERFETCH: usize = 2;

/// Whether any keyword occurs in `text`, ignoring case.
///
/// An empty keyword list means no filter was requested and always matches.
pub fn matches_keywords<S: AsRef<str>>(text: &str, keywords: &[S]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let text_lower = text.to_lowercase();
    keywords
        .iter()
        .any(|kw| text_lower.contains(&kw.as_ref().to_lowercase()))
}

/// Number of upstream candidates to scan for `limit` accepted papers.
///
/// Best-effort: a run may still return fewer than `limit` papers.
pub fn candidate_budget(limit: usize, has_keywords: bool) -> usize {
    let factor = if has_keywords {
        KEYWORD_OVERFETCH
    } else {
        PLAIN_OVERFETCH
    };
    limit.saturating_mul(factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match_scenarios() {
        let text = "Foo Bar baz";
        assert!(matches_keywords(text, &["baz"]));
        assert!(!matches_keywords(text, &["qux"]));
        assert!(matches_keywords::<&str>(text, &[]));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_or() {
        let text = "Diffusion Models for Protein Design";
        assert!(matches_keywords(text, &["PROTEIN"]));
        assert!(matches_keywords(text, &["transformer", "diffusion"]));
        assert!(!matches_keywords(text, &["transformer", "graph"]));
    }

    #[test]
    fn test_keyword_match_is_substring() {
        assert!(matches_keywords("Genomics at scale", &["genom"]));
    }

    #[test]
    fn test_candidate_budget() {
        assert_eq!(candidate_budget(10, true), 100);
        assert_eq!(candidate_budget(10, false), 20);
        assert_eq!(candidate_budget(100, true), 1000);
    }
}
