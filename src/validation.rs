use thiserror::Error;

use crate::models::Style;

/// Validation failures surfaced to the user before anything is dispatched.
/// Messages match the form's error banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your business name")]
    MissingBusinessName,
    #[error("Please enter a description for your logo")]
    MissingDescription,
    #[error("Please select at least one style")]
    NoStyleSelected,
}

/// Check the required form fields. Order is fixed: business name, then
/// description, then styles; the first failing check wins and later ones
/// are not evaluated. Succeeding has no side effects.
pub fn validate(
    business_name: &str,
    description: &str,
    styles: &[Style],
) -> Result<(), ValidationError> {
    if business_name.trim().is_empty() {
        return Err(ValidationError::MissingBusinessName);
    }
    if description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    if styles.is_empty() {
        return Err(ValidationError::NoStyleSelected);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_complete_input() {
        assert_eq!(validate("Acme Roasters", "a steaming coffee cup", &[Style::Vintage]), Ok(()));
    }

    #[test]
    fn rejects_missing_business_name() {
        assert_eq!(
            validate("", "a logo", &[Style::Modern]),
            Err(ValidationError::MissingBusinessName)
        );
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        assert_eq!(
            validate("   ", "a logo", &[Style::Modern]),
            Err(ValidationError::MissingBusinessName)
        );
        assert_eq!(
            validate("Acme", "\t\n", &[Style::Modern]),
            Err(ValidationError::MissingDescription)
        );
    }

    #[test]
    fn rejects_missing_description() {
        assert_eq!(
            validate("Acme", "", &[Style::Modern]),
            Err(ValidationError::MissingDescription)
        );
    }

    #[test]
    fn rejects_empty_styles() {
        assert_eq!(validate("Acme", "a logo", &[]), Err(ValidationError::NoStyleSelected));
    }

    #[test]
    fn first_failing_check_is_reported() {
        // All three fields bad: business name is checked first.
        assert_eq!(validate("", "", &[]), Err(ValidationError::MissingBusinessName));
        // Name present, description and styles bad: description wins.
        assert_eq!(validate("Acme", "", &[]), Err(ValidationError::MissingDescription));
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(
            ValidationError::MissingBusinessName.to_string(),
            "Please enter your business name"
        );
        assert_eq!(
            ValidationError::NoStyleSelected.to_string(),
            "Please select at least one style"
        );
    }
}
