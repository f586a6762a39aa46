//! Argument token classification.

/// Literal that ends option scanning.
pub const NON_OPTION_SEPARATOR: &str = "--";

/// Splits `args` at the first literal `--`.
///
/// Returns the tokens before it, and the tokens after it (`None` when no
/// separator is present).
///
/// # Examples
///
/// ```
/// use command_args::split_non_options;
///
/// let args: Vec<String> = ["--user", "ann", "--", "-x", "--", "y"]
///     .into_iter()
///     .map(String::from)
///     .collect();
/// let (head, tail) = split_non_options(&args);
/// assert_eq!(head, ["--user", "ann"]);
/// assert_eq!(tail.unwrap(), ["-x", "--", "y"]);
///
/// let (head, tail) = split_non_options(&args[..2]);
/// assert_eq!(head.len(), 2);
/// assert!(tail.is_none());
/// ```
pub fn split_non_options(args: &[String]) -> (Vec<String>, Option<Vec<String>>) {
    match args.iter().position(|a| a == NON_OPTION_SEPARATOR) {
        Some(index) => (args[..index].to_vec(), Some(args[index + 1..].to_vec())),
        None => (args.to_vec(), None),
    }
}

/// Syntactic role of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `--name`; holds `name`.
    Long(&'a str),
    /// `-x`; holds everything after the dash.
    Short(&'a str),
    /// Anything else, including a lone `-`.
    Positional(&'a str),
}

impl<'a> Token<'a> {
    pub fn classify(token: &'a str) -> Self {
        if let Some(name) = token.strip_prefix("--") {
            Token::Long(name)
        } else if let Some(alias) = token.strip_prefix('-').filter(|a| !a.is_empty()) {
            Token::Short(alias)
        } else {
            Token::Positional(token)
        }
    }
}

/// A value token must not look like a long option.
pub(crate) fn usable_as_value(token: &str) -> bool {
    !token.starts_with("--")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Token::classify("--user-name"), Token::Long("user-name"));
        assert_eq!(Token::classify("-u"), Token::Short("u"));
        assert_eq!(Token::classify("-abc"), Token::Short("abc"));
        assert_eq!(Token::classify("-"), Token::Positional("-"));
        assert_eq!(Token::classify("file.txt"), Token::Positional("file.txt"));
    }

    #[test]
    fn test_negative_numbers_are_usable_values() {
        assert!(usable_as_value("-5"));
        assert!(usable_as_value("plain"));
        assert!(!usable_as_value("--next"));
    }

    #[test]
    fn test_separator_at_end_yields_empty_tail() {
        let args = vec!["a".to_string(), "--".to_string()];
        let (head, tail) = split_non_options(&args);
        assert_eq!(head, ["a"]);
        assert_eq!(tail, Some(Vec::new()));
    }
}
