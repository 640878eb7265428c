pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

// True when `needle` occurs inside `haystack` after normalization.
// An empty needle never matches.
pub fn contains(haystack: &str, needle: &str) -> bool {
    let needle = normalize(needle);
    if needle.is_empty() {
        return false;
    }
    normalize(haystack).contains(&needle)
}

pub fn names_match(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.contains(&b) || b.contains(&a)
}

pub fn word_overlap(query: &str, candidate: &str) -> bool {
    let candidate = normalize(candidate);
    normalize(query)
        .split_whitespace()
        .any(|word| candidate.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_either_direction() {
        assert!(names_match("Nausea", "nausea"));
        assert!(names_match("Nausea", "Nausea and vomiting"));
        assert!(names_match("  severe NAUSEA ", "nausea"));
        assert!(!names_match("Headache", "Nausea"));
    }

    #[test]
    fn test_empty_never_matches() {
        assert!(!names_match("", "Nausea"));
        assert!(!names_match("Nausea", "   "));
        assert!(!contains("warfarin", ""));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        assert!(contains("Warfarin 5mg daily", "WARFARIN"));
        assert!(!contains("aspirin", "ibuprofen"));
    }

    #[test]
    fn test_word_overlap() {
        assert!(word_overlap("extended release Metformin", "Metformin"));
        assert!(!word_overlap("lisinopril", "Metformin"));
        assert!(!word_overlap("   ", "Metformin"));
    }
}
