use super::ApiError;

pub fn validate_video_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid video ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_username(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Username cannot be empty"));
    }

    if trimmed.len() > 32 {
        return Err(ApiError::validation(
            "Username must be 32 characters or less",
        ));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, dots, hyphens, and underscores",
        ));
    }

    Ok(trimmed)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }
    Ok(password)
}

pub fn validate_nonempty<'a>(value: &'a str, field: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}

pub fn validate_comment(content: &str) -> Result<&str, ApiError> {
    const MAX_COMMENT_CHARS: usize = 2000;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Comment cannot be empty"));
    }

    if trimmed.chars().count() > MAX_COMMENT_CHARS {
        return Err(ApiError::validation(format!(
            "Comment must be {} characters or less",
            MAX_COMMENT_CHARS
        )));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_video_id() {
        assert!(validate_video_id(1).is_ok());
        assert!(validate_video_id(12345).is_ok());
        assert!(validate_video_id(0).is_err());
        assert!(validate_video_id(-1).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob_the.builder-2").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("a".repeat(33).as_str()).is_err());
        assert!(validate_username("not ok").is_err());
        assert!(validate_username("bad@name").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_nonempty() {
        assert_eq!(validate_nonempty("  hi  ", "Title").unwrap(), "hi");
        assert!(validate_nonempty("", "Title").is_err());
        assert!(validate_nonempty("   ", "Title").is_err());
    }

    #[test]
    fn test_validate_comment() {
        assert!(validate_comment("nice video").is_ok());
        assert!(validate_comment("").is_err());
        assert!(validate_comment("   ").is_err());
        assert!(validate_comment(&"x".repeat(2001)).is_err());
    }
}
