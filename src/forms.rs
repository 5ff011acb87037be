use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

/// Text inputs are stripped before validation.
fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username"))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryForm {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EventForm {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0, max = 2147483647))]
    pub number: i64,
    pub category: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatForm {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1))]
    pub body: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 150), custom(function = "validate_username"))]
    pub username: String,
    pub next: Option<String>,
}
