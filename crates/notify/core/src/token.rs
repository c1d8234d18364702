//! Push token format predicate.

/// Prefixes the relay accepts for bracketed device tokens.
const BRACKETED_PREFIXES: [&str; 2] = ["ExponentPushToken[", "ExpoPushToken["];

/// Group lengths of a bare device identifier (`8-4-4-4-12`).
const BARE_GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// Check whether `token` is in a format the push relay can deliver to.
///
/// Accepts `ExponentPushToken[..]` / `ExpoPushToken[..]` with a non-empty
/// identifier, and bare `8-4-4-4-12` identifiers of ASCII letters and digits.
/// Rejects everything else.
pub fn is_valid_token(token: &str) -> bool {
    if let Some(inner) = BRACKETED_PREFIXES
        .iter()
        .find_map(|prefix| token.strip_prefix(prefix))
    {
        return inner.strip_suffix(']').is_some_and(|id| !id.is_empty());
    }

    is_bare_identifier(token)
}

fn is_bare_identifier(token: &str) -> bool {
    let groups: Vec<&str> = token.split('-').collect();
    groups.len() == BARE_GROUPS.len()
        && groups.iter().zip(BARE_GROUPS).all(|(group, len)| {
            group.len() == len && group.bytes().all(|b| b.is_ascii_alphanumeric())
        })
}

/// A push token that passed [`is_valid_token`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct PushToken(String);

impl PushToken {
    /// Parse a candidate token, returning `None` if the format is not deliverable.
    pub fn parse(token: impl Into<String>) -> Option<Self> {
        Self::parse_with(token, is_valid_token)
    }

    /// Parse a candidate token against a relay-specific format check.
    pub fn parse_with(token: impl Into<String>, is_valid: impl Fn(&str) -> bool) -> Option<Self> {
        let token = token.into();
        is_valid(&token).then_some(Self(token))
    }

    /// Borrow the raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PushToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_tokens() {
        assert!(is_valid_token("ExponentPushToken[abc]"));
        assert!(is_valid_token("ExpoPushToken[xxxxxxxxxxxxxxxxxxxxxx]"));
        assert!(!is_valid_token("ExponentPushToken[]"));
        assert!(!is_valid_token("ExponentPushToken[abc"));
        assert!(is_valid_token("ExponentPushToken[a]b]"));
        assert!(!is_valid_token("exponentpushtoken[abc]"));
        assert!(!is_valid_token("PushToken[abc]"));
    }

    #[test]
    fn test_bare_tokens() {
        assert!(is_valid_token("f47ac10b-58cc-4372-a567-0e02b2c3d479"));
        assert!(is_valid_token("F47AC10B-58CC-4372-A567-0E02B2C3D479"));
        // device identifiers are alphanumeric, not only hex
        assert!(is_valid_token("zzzzzzzz-yyyy-xxxx-wwww-vvvvvvvvvvvv"));
        assert!(!is_valid_token("f47ac10b58cc4372a5670e02b2c3d479"));
        assert!(!is_valid_token("{f47ac10b-58cc-4372-a567-0e02b2c3d479}"));
        assert!(!is_valid_token("f47ac10b-58cc-4372-a567-0e02b2c3d47"));
        assert!(!is_valid_token("f47ac10b-58cc-4372-a567_0e02b2c3d479"));
        assert!(!is_valid_token("f47ac10b-58cc-4372-a567-0e02b2c3d4é9"));
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(!is_valid_token(""));
        assert!(!is_valid_token("invalid-token"));
        assert!(!is_valid_token(" ExponentPushToken[abc]"));
    }

    #[test]
    fn test_push_token_parse() {
        let token = PushToken::parse("ExponentPushToken[abc]").unwrap();
        assert_eq!(token.as_str(), "ExponentPushToken[abc]");
        assert_eq!(token.to_string(), "ExponentPushToken[abc]");
        assert!(PushToken::parse("nope").is_none());
        assert!(PushToken::parse_with("nope", |t| t == "nope").is_some());
    }
}
