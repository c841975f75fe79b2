//! Generic string utilities
//!
//! Small, non-recursive text helpers used across the engine. The break
//! inserter doubles as the folding primitive for base64 key rendering.

/// Replace every occurrence of `needle`, counting the replacements
///
/// Scans left to right and continues after each inserted replacement, so
/// a replacement string containing the needle never recurses:
///
/// ```rust
/// use mail_text_engine::textutils::replace_counted;
///
/// assert_eq!(replace_counted("aaa", "a", "ab"), ("ababab".to_string(), 3));
/// ```
///
/// An empty needle performs no replacements.
pub fn replace_counted(haystack: &str, needle: &str, replacement: &str) -> (String, usize) {
    if needle.is_empty() {
        return (haystack.to_string(), 0);
    }
    let mut out = String::with_capacity(haystack.len());
    let mut count = 0;
    let mut rest = haystack;
    while let Some(idx) = rest.find(needle) {
        out.push_str(&rest[..idx]);
        out.push_str(replacement);
        rest = &rest[idx + needle.len()..];
        count += 1;
    }
    out.push_str(rest);
    (out, count)
}

/// Insert `break_str` after every `every` characters
///
/// No break is inserted after the final group, even when it is full.
/// With `every == 0` or an empty `break_str` the input is returned
/// unchanged.
///
/// ```rust
/// use mail_text_engine::textutils::insert_breaks;
///
/// assert_eq!(insert_breaks("just1234test", 4, " "), "just 1234 test");
/// assert_eq!(insert_breaks("just1234tes", 4, "--"), "just--1234--tes");
/// ```
pub fn insert_breaks(input: &str, every: usize, break_str: &str) -> String {
    if every == 0 || break_str.is_empty() {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut in_group = 0;
    for ch in input.chars() {
        if in_group == every {
            out.push_str(break_str);
            in_group = 0;
        }
        out.push(ch);
        in_group += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_replace_counted_no_recursion() {
        // Replacement contains the needle; the scan must move past it
        assert_eq!(replace_counted("aaa", "a", "ab"), ("ababab".to_string(), 3));
    }

    #[test]
    fn test_replace_counted_no_match() {
        assert_eq!(replace_counted("abc", "x", "y"), ("abc".to_string(), 0));
    }

    #[test]
    fn test_replace_counted_multichar_needle() {
        assert_eq!(
            replace_counted("one, two, three", ", ", "; "),
            ("one; two; three".to_string(), 2)
        );
    }

    #[test]
    fn test_replace_counted_empty_needle_is_noop() {
        assert_eq!(replace_counted("abc", "", "x"), ("abc".to_string(), 0));
    }

    #[test]
    fn test_insert_breaks_between_full_groups() {
        assert_eq!(insert_breaks("just1234test", 4, " "), "just 1234 test");
    }

    #[test]
    fn test_insert_breaks_short_final_group() {
        assert_eq!(insert_breaks("just1234tes", 4, "--"), "just--1234--tes");
    }

    #[test]
    fn test_insert_breaks_empty_break_string() {
        assert_eq!(insert_breaks("just1234t", 4, ""), "just1234t");
    }

    #[test]
    fn test_insert_breaks_empty_input() {
        assert_eq!(insert_breaks("", 4, "---"), "");
    }

    #[test]
    fn test_insert_breaks_zero_width() {
        assert_eq!(insert_breaks("abc", 0, " "), "abc");
    }

    #[test]
    fn test_insert_breaks_input_shorter_than_width() {
        assert_eq!(insert_breaks("ab", 4, " "), "ab");
    }

    proptest! {
        // Removing the break string from the folded form restores the
        // input (for inputs that cannot contain the break string)
        #[test]
        fn prop_insert_breaks_reversible(
            input in "[a-zA-Z0-9+/=]{0,120}",
            every in 1usize..40,
        ) {
            let folded = insert_breaks(&input, every, "\r\n ");
            prop_assert_eq!(folded.replace("\r\n ", ""), input);
        }

        // Replacement count times needle length accounts for the size change
        #[test]
        fn prop_replace_counted_size_accounting(
            haystack in "[ab]{0,60}",
        ) {
            let (out, count) = replace_counted(&haystack, "a", "xy");
            let expected_len = haystack.len() + count;
            prop_assert_eq!(out.len(), expected_len);
        }
    }
}
