//! CLI Exit Code Registry
//!
//! All exit codes the `tagcalc` binary returns. Scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                                   |
//! |---------|-----------|-----------------------------------------------|
//! | 0       | Universal | Success                                       |
//! | 1       | Universal | General error (unspecified)                   |
//! | 2       | Universal | CLI usage error (bad args, unparsable value)  |
//! | 3-9     | formula   | Evaluation and lookup codes                   |
//! | 10-19   | store     | Settings / persisted store codes              |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments or a value that does not parse.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Formula (3-9)
// =============================================================================

/// Formula evaluated to "Error" (unknown variable, syntax, division by zero).
pub const EXIT_EVAL_ERROR: u8 = 3;

/// A referenced id (saved formula, variable, model, example) does not exist.
pub const EXIT_NOT_FOUND: u8 = 4;

/// Operation refused by an engine rule (e.g. removing the last model).
pub const EXIT_REFUSED: u8 = 5;

// =============================================================================
// Store (10-19)
// =============================================================================

/// Persisted store could not be written.
pub const EXIT_STORE_WRITE: u8 = 10;

/// Storage namespace in settings is invalid.
pub const EXIT_STORE_NAMESPACE: u8 = 11;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_EVAL_ERROR,
            EXIT_NOT_FOUND,
            EXIT_REFUSED,
            EXIT_STORE_WRITE,
            EXIT_STORE_NAMESPACE,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }
}
