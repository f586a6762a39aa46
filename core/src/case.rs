//! Case conversion between command-line and schema key forms.
//!
//! Flags and command names are written in kebab case (`max-retries`) while
//! schema keys use the internal camelCase form (`maxRetries`). Both
//! directions split the input into words on `-`, `_`, whitespace and
//! lower-to-upper transitions, so either form converts cleanly into the
//! other.

/// Target style for [`convert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// Schema key form: `maxRetries`.
    Internal,
    /// Command-line form: `max-retries`.
    Kebab,
}

/// Converts `token` into the requested case.
///
/// # Examples
///
/// ```
/// use command_args_core::{Case, convert};
///
/// assert_eq!(convert("sendMessage", Case::Kebab), "send-message");
/// assert_eq!(convert("send-message", Case::Internal), "sendMessage");
/// assert_eq!(convert("HTTPServer", Case::Kebab), "http-server");
/// assert_eq!(convert("verbose", Case::Internal), "verbose");
/// ```
pub fn convert(token: &str, case: Case) -> String {
    let words = split_words(token);
    match case {
        Case::Kebab => words.join("-"),
        Case::Internal => {
            let mut out = String::with_capacity(token.len());
            for (i, word) in words.iter().enumerate() {
                if i == 0 {
                    out.push_str(word);
                } else {
                    let mut chars = word.chars();
                    if let Some(first) = chars.next() {
                        out.extend(first.to_uppercase());
                        out.push_str(chars.as_str());
                    }
                }
            }
            out
        }
    }
}

/// Splits into lowercase words. An uppercase run followed by a lowercase
/// letter ends one word early (`HTTPServer` -> `http`, `server`).
fn split_words(token: &str) -> Vec<String> {
    let chars: Vec<char> = token.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == '_' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }

        current.extend(c.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}
