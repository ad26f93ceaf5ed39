//! Field-level checks shared by the record types.

use std::fmt::Display;
use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub type Checked = Result<(), ValidationError>;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
    })
}

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern compiles"))
}

fn color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("color pattern compiles"))
}

pub fn required(field: &'static str, value: &str) -> Checked {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "this field may not be blank"));
    }
    Ok(())
}

pub fn max_chars(field: &'static str, value: &str, max: usize) -> Checked {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("ensure this field has no more than {max} characters"),
        ));
    }
    Ok(())
}

/// Required, bounded text.
pub fn text(field: &'static str, value: &str, max: usize) -> Checked {
    required(field, value)?;
    max_chars(field, value, max)
}

pub fn email(field: &'static str, value: &str) -> Checked {
    if !email_pattern().is_match(value.trim()) {
        return Err(ValidationError::new(field, "enter a valid email address"));
    }
    Ok(())
}

/// Blank is allowed, anything else must be an address.
pub fn optional_email(field: &'static str, value: &str) -> Checked {
    if value.trim().is_empty() {
        return Ok(());
    }
    email(field, value)
}

pub fn url(field: &'static str, value: &str) -> Checked {
    match url::Url::parse(value.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::new(field, "enter a valid URL")),
    }
}

pub fn optional_url(field: &'static str, value: Option<&str>) -> Checked {
    match value.map(str::trim) {
        None | Some("") => Ok(()),
        Some(value) => url(field, value),
    }
}

pub fn slug(field: &'static str, value: &str) -> Checked {
    if !slug_pattern().is_match(value) {
        return Err(ValidationError::new(
            field,
            "enter a valid slug of letters, numbers, underscores or hyphens",
        ));
    }
    Ok(())
}

pub fn hex_color(field: &'static str, value: &str) -> Checked {
    if !color_pattern().is_match(value) {
        return Err(ValidationError::new(field, "enter a hex color such as #3B82F6"));
    }
    Ok(())
}

pub fn within<T>(field: &'static str, value: T, min: T, max: T) -> Checked
where
    T: PartialOrd + Display + Copy,
{
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(())
}

pub fn at_least<T>(field: &'static str, value: T, min: T) -> Checked
where
    T: PartialOrd + Display + Copy,
{
    if value < min {
        return Err(ValidationError::new(field, format!("must be at least {min}")));
    }
    Ok(())
}

/// `later` must not precede `earlier` when both are present.
pub fn ordered<T: PartialOrd>(
    field: &'static str,
    earlier: Option<T>,
    later: Option<T>,
) -> Checked {
    if let (Some(earlier), Some(later)) = (earlier, later) {
        if later < earlier {
            return Err(ValidationError::new(field, "must not be earlier than its start"));
        }
    }
    Ok(())
}

/// Lower-case, hyphen separated form of a title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch == '-' || ch == '_' || ch.is_whitespace() {
            pending_dash = true;
        }
    }
    slug
}

/// Split a comma separated tag string into trimmed, non-empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Annual Sports Day -- 2025! "), "annual-sports-day-2025");
        assert_eq!(slugify("Math_Teacher (Senior)"), "math-teacher-senior");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn email_and_url_checks() {
        assert!(email("email", "office@school.edu").is_ok());
        assert!(email("email", "office@school").is_err());
        assert!(optional_email("contact_email", "  ").is_ok());
        assert!(url("image_url", "https://cdn.example.org/a.jpg").is_ok());
        assert!(url("image_url", "ftp://cdn.example.org/a.jpg").is_err());
        assert!(optional_url("button_link", Some("")).is_ok());
        assert!(optional_url("button_link", Some("not a url")).is_err());
    }

    #[test]
    fn color_slug_and_ranges() {
        assert!(hex_color("color", "#3B82F6").is_ok());
        assert!(hex_color("color", "3B82F6").is_err());
        assert!(slug("slug", "science-teacher_2").is_ok());
        assert!(slug("slug", "science teacher").is_err());
        assert!(within("rating", 5, 1, 5).is_ok());
        assert_eq!(within("rating", 6, 1, 5).unwrap_err().field, "rating");
        assert!(ordered("end_date", Some(2), Some(1)).is_err());
        assert!(ordered::<i32>("end_date", Some(2), None).is_ok());
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list("sports, ,  annual day,"), vec!["sports", "annual day"]);
    }
}
