//! Argument checks applied before any request is sent.

use crate::error::{DataFlowError, DataFlowResult};

/// Fails when `value` is below `min_val`
pub fn validate_integer(value: i64, title: &str, min_val: i64) -> DataFlowResult<()> {
    if value < min_val {
        return Err(DataFlowError::invalid_param(format!(
            "{} should be >= {}",
            title, min_val
        )));
    }
    Ok(())
}

/// Fails when `value` is empty or whitespace only
pub fn validate_str(value: &str, title: &str) -> DataFlowResult<()> {
    if value.trim().is_empty() {
        return Err(DataFlowError::invalid_param(format!(
            "{} should be a non empty string",
            title
        )));
    }
    Ok(())
}
