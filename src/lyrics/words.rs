//! Whitespace word counting.

/// Counts whitespace-separated tokens.
///
/// Runs of spaces, tabs and newlines are treated uniformly; punctuation
/// attached to a token does not split it.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("hello world"), 2);
        assert_eq!(count_words("hello, world! how are you?"), 5);
    }

    #[test]
    fn whitespace_runs_count_once() {
        assert_eq!(count_words("a  b\t\tc\n\nd"), 4);
        assert_eq!(count_words("   "), 0);
    }
}
