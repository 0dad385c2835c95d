const MAX_USERNAME_LEN: usize = 255;
const MAX_EMAIL_LEN: usize = 254;

/// Route-like names that may not be claimed as usernames or namespace paths.
pub const RESERVED_USERNAMES: &[&str] = &[
    "admin",
    "administrator",
    "api",
    "dashboard",
    "files",
    "groups",
    "help",
    "profile",
    "projects",
    "public",
    "root",
    "search",
    "settings",
    "support",
    "system",
    "users",
];

fn is_valid_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'
}

/// Usernames must start with a letter, use only letters, digits, hyphens,
/// underscores, and periods, and avoid the reserved-name blacklist.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username cannot be empty".to_string());
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(format!(
            "Username cannot exceed {MAX_USERNAME_LEN} characters"
        ));
    }
    if !username.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err("Username must start with a letter".to_string());
    }
    if !username.chars().all(is_valid_username_char) {
        return Err(
            "Username can only contain letters, digits, hyphens, underscores, and periods"
                .to_string(),
        );
    }
    if RESERVED_USERNAMES
        .iter()
        .any(|r| r.eq_ignore_ascii_case(username))
    {
        return Err(format!("Username '{username}' is reserved"));
    }
    Ok(())
}

/// Syntactic check only; uniqueness is not enforced at this layer.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(format!("Email cannot exceed {MAX_EMAIL_LEN} characters"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err("Email must contain exactly one '@'".to_string());
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err("Email is not valid".to_string());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Email domain is not valid".to_string());
    }
    if email.chars().any(char::is_whitespace) {
        return Err("Email cannot contain whitespace".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        for name in ["alice", "a", "bob-smith", "carol_99", "d.eve", "Frank"] {
            assert!(validate_username(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_usernames() {
        for name in ["", "9lives", "_lead", "-dash", ".dot", "sp ace", "tab\t"] {
            assert!(validate_username(name).is_err(), "{name} should be invalid");
        }
    }

    #[test]
    fn test_reserved_usernames() {
        assert!(validate_username("admin").is_err());
        assert!(validate_username("Admin").is_err());
        assert!(validate_username("api").is_err());
        assert!(validate_username("adminx").is_ok());
    }

    #[test]
    fn test_emails() {
        assert!(validate_email("a@example.com").is_ok());
        assert!(validate_email("first.last@sub.example.org").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a@.com").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }
}
