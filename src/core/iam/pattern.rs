//! Wildcard matching for IAM actions, resources and ARNs
//!
//! Only one metacharacter is recognised:
//! - `*` - Matches any run of characters, including the empty run
//!
//! Every other character matches itself, case-sensitive. There is no
//! segment structure: `*` happily crosses `:` and `/`.

/// Wildcard matcher for policy strings
pub struct PatternMatcher;

impl PatternMatcher {
    /// Check if a literal matches a wildcard pattern
    ///
    /// # Examples
    /// ```
    /// use cfn_check::PatternMatcher;
    ///
    /// assert!(PatternMatcher::matches("s3:*", "s3:GetObject"));
    /// assert!(PatternMatcher::matches("arn:aws:iam::aws:policy/*ReadOnlyAccess",
    ///     "arn:aws:iam::aws:policy/AmazonS3ReadOnlyAccess"));
    /// assert!(!PatternMatcher::matches("s3:Get*", "s3:PutObject"));
    /// ```
    pub fn matches(pattern: &str, literal: &str) -> bool {
        if !pattern.contains('*') {
            return pattern == literal;
        }

        // At least two parts: text before the first `*` and after the last one
        let parts: Vec<&str> = pattern.split('*').collect();
        let head = parts[0];
        let tail = parts[parts.len() - 1];

        if !literal.starts_with(head) {
            return false;
        }
        let mut pos = head.len();

        // Middle parts must appear in order; leftmost placement leaves the
        // most room for the rest
        for part in &parts[1..parts.len() - 1] {
            if part.is_empty() {
                continue;
            }
            match literal[pos..].find(part) {
                Some(found) => pos += found + part.len(),
                None => return false,
            }
        }

        // Tail may not overlap anything already consumed
        literal.len() >= pos + tail.len() && literal.ends_with(tail)
    }

    /// True if any of the patterns matches the literal
    pub fn matches_any<S: AsRef<str>>(patterns: &[S], literal: &str) -> bool {
        patterns
            .iter()
            .any(|pattern| Self::matches(pattern.as_ref(), literal))
    }
}
