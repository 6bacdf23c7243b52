//! User-agent compatibility checks
//!
//! A refreshed token must come from the same kind of client that the
//! original token was issued to. Raw user-agent strings drift between
//! minor browser releases, so equality is judged on the parsed device
//! category, OS family and browser family instead of the full string.

use woothee::parser::Parser;

/// The coarse parts of a user-agent that must stay stable across
/// requests from the same client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentProfile {
    pub category: String,
    pub os: String,
    pub browser: String,
}

impl UserAgentProfile {
    /// Parse a raw user-agent string into its stable profile.
    ///
    /// Returns `None` when the string is not recognized.
    pub fn parse(user_agent: &str) -> Option<Self> {
        let result = Parser::new().parse(user_agent)?;
        Some(Self {
            category: result.category.to_string(),
            os: result.os.to_string(),
            browser: result.name.to_string(),
        })
    }
}

/// Check whether two user-agent strings describe a compatible client.
///
/// Unrecognized strings fall back to exact comparison.
pub fn is_compatible(original: &str, presented: &str) -> bool {
    match (
        UserAgentProfile::parse(original),
        UserAgentProfile::parse(presented),
    ) {
        (Some(a), Some(b)) => a == b,
        _ => original == presented,
    }
}
