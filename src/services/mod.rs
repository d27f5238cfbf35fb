//! Store-facing operations. Handlers in `routes` stay thin and call into
//! these; each returns named entity models or view structs, never raw rows.

pub mod catalog;
pub mod customers;
pub mod orders;
pub mod reports;
pub mod reviews;

use crate::error::{CafeError, CafeResult};

/// Length limits for free text fields.
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_SHORT_TEXT_LEN: usize = 50;
pub const MAX_REVIEW_LEN: usize = 1000;

/// Rejects blank or overlong required text, returning the trimmed value.
pub(crate) fn required_text(value: &str, field: &str, max_len: usize) -> CafeResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CafeError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(CafeError::Validation(format!(
            "{field} is too long (max {max_len} chars)"
        )));
    }
    Ok(trimmed.to_owned())
}

pub(crate) fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("  Latte ", "name", 10).unwrap(), "Latte");
        assert!(matches!(
            required_text("   ", "name", 10),
            Err(CafeError::Validation(_))
        ));
        assert!(matches!(
            required_text("Extra long name", "name", 5),
            Err(CafeError::Validation(_))
        ));
    }
}
