//! Syntactic check of order expressions: a comma list of
//! `field [asc|desc]`, direction case-insensitive.

use crate::error::ValidationError;

pub fn check_order<F>(expr: &str, field_allowed: F) -> Result<(), ValidationError>
where
    F: Fn(&str) -> bool,
{
    if expr.trim().is_empty() {
        return Err(ValidationError::InvalidOrder("empty expression".into()));
    }
    for term in expr.split(',') {
        let mut parts = term.split_whitespace();
        let Some(field) = parts.next() else {
            return Err(ValidationError::InvalidOrder(format!(
                "empty term in '{expr}'"
            )));
        };
        if !field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err(ValidationError::InvalidOrder(format!(
                "invalid field reference '{field}'"
            )));
        }
        let root = field.split('.').next().unwrap_or(field);
        if !field_allowed(root) {
            return Err(ValidationError::UnknownField {
                field: root.to_string(),
                context: "order".to_string(),
            });
        }
        if let Some(direction) = parts.next() {
            if !direction.eq_ignore_ascii_case("asc") && !direction.eq_ignore_ascii_case("desc") {
                return Err(ValidationError::InvalidOrder(format!(
                    "direction must be ASC or DESC, got '{direction}'"
                )));
            }
        }
        if parts.next().is_some() {
            return Err(ValidationError::InvalidOrder(format!(
                "trailing tokens in term '{term}'"
            )));
        }
    }
    Ok(())
}
