//! Token estimation.

/// Approximate token count: one token per four characters, rounded up.
///
/// Not a tokenizer. The estimate only grows as text is appended, so a sum of
/// per-part estimates is never below the estimate of the joined text.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::estimate_tokens;

    #[test]
    fn empty_text_is_zero() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn rounds_up_partial_tokens() {
        assert_eq!(estimate_tokens("a"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(estimate_tokens("ééééé"), 2);
    }

    #[test]
    fn concatenation_never_decreases_estimate() {
        let parts = ["fn main() {}", "\n", "+ let x = 1;", "", "héllo wörld", "a b c d e f"];
        for left in parts {
            for right in parts {
                let joined = format!("{left}{right}");
                assert!(estimate_tokens(&joined) >= estimate_tokens(left));
                assert!(estimate_tokens(&joined) >= estimate_tokens(right));
                assert!(estimate_tokens(&joined) <= estimate_tokens(left) + estimate_tokens(right));
            }
        }
    }
}
