use crate::domain::error::DomainError;

/// Parse a user identifier from its path form.
///
/// Any finite decimal number is accepted and truncated toward zero, so `"12"`
/// and `"12.9"` both address user 12. Non-numeric input, `NaN`/infinities and
/// values outside the `i32` key range are rejected.
pub fn parse_user_id(raw: &str) -> Result<i32, DomainError> {
    let value: f64 = raw.trim().parse().map_err(|_| DomainError::InvalidId)?;
    if !value.is_finite() {
        return Err(DomainError::InvalidId);
    }

    let truncated = value.trunc();
    if truncated < f64::from(i32::MIN) || truncated > f64::from(i32::MAX) {
        return Err(DomainError::InvalidId);
    }
    Ok(truncated as i32)
}
