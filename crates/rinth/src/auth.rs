//! Token resolution.
//!
//! A token can come from three places: the call itself, the entity the call
//! was made on (a project or user fetched with a token carries it), and the
//! client configuration. The first non-empty one wins.

use crate::error::{Error, Result};

/// Returns `explicit` when it holds a non-empty token, `fallback` otherwise.
pub fn resolve_auth<'a>(explicit: Option<&'a str>, fallback: Option<&'a str>) -> Option<&'a str> {
    explicit
        .filter(|token| !token.is_empty())
        .or(fallback.filter(|token| !token.is_empty()))
}

/// A write operation cannot be sent without a token.
pub(crate) fn require_auth<'a>(token: Option<&'a str>, action: &str) -> Result<&'a str> {
    token.ok_or_else(|| Error::NoAuthorization(format!("no token given to {action}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_token_wins() {
        assert_eq!(Some("explicit"), resolve_auth(Some("explicit"), Some("carried")));
    }

    #[test]
    fn falls_back_when_explicit_is_missing_or_empty() {
        assert_eq!(Some("carried"), resolve_auth(None, Some("carried")));
        assert_eq!(Some("carried"), resolve_auth(Some(""), Some("carried")));
    }

    #[test]
    fn nothing_resolves_to_none() {
        assert_eq!(None, resolve_auth(None, None));
        assert_eq!(None, resolve_auth(Some(""), Some("")));
    }

    #[test]
    fn chains_compose() {
        let client_default = Some("client");
        let carried = None;
        assert_eq!(
            Some("client"),
            resolve_auth(None, resolve_auth(carried, client_default))
        );
    }

    #[test]
    fn require_auth_rejects_missing_token() {
        assert!(matches!(
            require_auth(None, "delete this project"),
            Err(Error::NoAuthorization(_))
        ));
        assert_eq!("t", require_auth(Some("t"), "delete this project").unwrap());
    }
}
