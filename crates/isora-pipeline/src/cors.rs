/// Explicit CORS allow-list check (§4.9 step 1): a pure function standing in
/// for a bound HTTP CORS layer, consulted before any other pipeline stage.
pub fn is_origin_allowed(origin: &str, allow_list: &[String]) -> bool {
    allow_list.iter().any(|allowed| allowed == "*" || allowed == origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_allows_any_origin() {
        let allow_list = vec!["*".to_string()];
        assert!(is_origin_allowed("https://example.com", &allow_list));
    }

    #[test]
    fn exact_match_required_without_wildcard() {
        let allow_list = vec!["https://app.isora.example".to_string()];
        assert!(is_origin_allowed("https://app.isora.example", &allow_list));
        assert!(!is_origin_allowed("https://evil.example", &allow_list));
    }

    #[test]
    fn empty_allow_list_rejects_everything() {
        assert!(!is_origin_allowed("https://app.isora.example", &[]));
    }
}
