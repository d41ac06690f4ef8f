// Error handling utilities for consistent error messages and exit codes

use std::process;

use crate::models::Status;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, unknown sources, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Validate that a string is not empty
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate a row number as shown in the `#` column (1-based)
pub fn validate_row_number(row_str: &str) -> Result<usize, String> {
    row_str
        .parse::<usize>()
        .map_err(|_| format!("Invalid row: '{}'. Row must be a number.", row_str))
        .and_then(|row| {
            if row > 0 {
                Ok(row)
            } else {
                Err(format!("Invalid row: {}. Rows are numbered from 1.", row))
            }
        })
}

/// Validate a status label or alias
pub fn validate_status(input: &str) -> Result<Status, String> {
    Status::parse(input).ok_or_else(|| {
        let labels: Vec<&str> = Status::ALL.iter().map(|s| s.label()).collect();
        format!(
            "Invalid status: '{}'. Valid statuses: {} (or todo, doing, done).",
            input,
            labels.join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty("test", "field").is_ok());
        assert!(validate_non_empty("", "field").is_err());
        assert!(validate_non_empty("   ", "field").is_err());
    }

    #[test]
    fn test_validate_row_number() {
        assert_eq!(validate_row_number("1"), Ok(1));
        assert_eq!(validate_row_number("12"), Ok(12));
        assert!(validate_row_number("0").is_err());
        assert!(validate_row_number("-1").is_err());
        assert!(validate_row_number("abc").is_err());
        assert!(validate_row_number("").is_err());
    }

    #[test]
    fn test_validate_status() {
        assert_eq!(validate_status("fait"), Ok(Status::Done));
        assert_eq!(validate_status("En cours"), Ok(Status::InProgress));
        assert_eq!(validate_status("todo"), Ok(Status::NotStarted));
        let err = validate_status("blocked").unwrap_err();
        assert!(err.contains("PAS FAIT, EN COURS, FAIT"));
    }
}
