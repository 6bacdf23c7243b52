//! Credential format validation
//!
//! Usernames and passwords are checked character by character so that
//! every violated rule is reported, not just the first one found.

/// Username length bounds (inclusive)
pub const USERNAME_MIN_LEN: usize = 4;
pub const USERNAME_MAX_LEN: usize = 48;

/// Password length bounds (inclusive)
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 1024;

/// Minimum number of distinct character classes a password must mix
pub const PASSWORD_MIN_CHAR_TYPES: usize = 2;

/// A violated username rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameIssue {
    Required,
    TooShort,
    TooLong,
    InvalidChar,
}

impl UsernameIssue {
    pub fn code(&self) -> &'static str {
        match self {
            UsernameIssue::Required => "USERNAME_REQUIRED",
            UsernameIssue::TooShort => "USERNAME_TOO_SHORT",
            UsernameIssue::TooLong => "USERNAME_TOO_LONG",
            UsernameIssue::InvalidChar => "USERNAME_CONTAINS_INVALID_CHAR",
        }
    }

    pub fn message(&self) -> String {
        match self {
            UsernameIssue::Required => String::from("username is required"),
            UsernameIssue::TooShort => {
                format!("username must be at least {} characters", USERNAME_MIN_LEN)
            }
            UsernameIssue::TooLong => {
                format!("username must be at most {} characters", USERNAME_MAX_LEN)
            }
            UsernameIssue::InvalidChar => String::from(
                "username may only contain letters, digits, hyphens and underscores",
            ),
        }
    }
}

/// A violated password rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordIssue {
    Required,
    TooShort,
    TooLong,
    InvalidChar,
    NeedMoreCharTypes,
}

impl PasswordIssue {
    pub fn code(&self) -> &'static str {
        match self {
            PasswordIssue::Required => "PASSWORD_REQUIRED",
            PasswordIssue::TooShort => "PASSWORD_TOO_SHORT",
            PasswordIssue::TooLong => "PASSWORD_TOO_LONG",
            PasswordIssue::InvalidChar => "PASSWORD_CONTAINS_INVALID_CHAR",
            PasswordIssue::NeedMoreCharTypes => "PASSWORD_NEED_MORE_CHAR_TYPE",
        }
    }

    pub fn message(&self) -> String {
        match self {
            PasswordIssue::Required => String::from("password is required"),
            PasswordIssue::TooShort => {
                format!("password must be at least {} characters", PASSWORD_MIN_LEN)
            }
            PasswordIssue::TooLong => {
                format!("password must be at most {} characters", PASSWORD_MAX_LEN)
            }
            PasswordIssue::InvalidChar => {
                String::from("password may only contain printable characters")
            }
            PasswordIssue::NeedMoreCharTypes => format!(
                "password must mix at least {} of: lowercase, uppercase, digits, symbols",
                PASSWORD_MIN_CHAR_TYPES
            ),
        }
    }
}

/// Validate a username, collecting every violated rule
pub fn validate_username(username: &str) -> Result<(), Vec<UsernameIssue>> {
    if username.is_empty() {
        return Err(vec![UsernameIssue::Required]);
    }
    let mut issues = Vec::new();
    let len = username.chars().count();
    if len < USERNAME_MIN_LEN {
        issues.push(UsernameIssue::TooShort);
    }
    if len > USERNAME_MAX_LEN {
        issues.push(UsernameIssue::TooLong);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        issues.push(UsernameIssue::InvalidChar);
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Validate a password, collecting every violated rule
pub fn validate_password(password: &str) -> Result<(), Vec<PasswordIssue>> {
    if password.is_empty() {
        return Err(vec![PasswordIssue::Required]);
    }
    let mut issues = Vec::new();
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        issues.push(PasswordIssue::TooShort);
    }
    if len > PASSWORD_MAX_LEN {
        issues.push(PasswordIssue::TooLong);
    }
    if !password.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
        issues.push(PasswordIssue::InvalidChar);
    }
    if char_type_count(password) < PASSWORD_MIN_CHAR_TYPES {
        issues.push(PasswordIssue::NeedMoreCharTypes);
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Loose email shape check: one `@`, a non-empty local part and a
/// dotted domain. Deliverability is the mail server's problem.
pub fn is_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        _ => false,
    }
}

/// Count the distinct character classes present in a string
fn char_type_count(s: &str) -> usize {
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut other = false;
    for c in s.chars() {
        if c.is_lowercase() {
            lower = true;
        } else if c.is_uppercase() {
            upper = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else {
            other = true;
        }
    }
    [lower, upper, digit, other].iter().filter(|b| **b).count()
}
