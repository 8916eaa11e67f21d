//! Result type alias for VaultFlow

use super::errors::VaultFlowError;

/// Result type alias for VaultFlow operations
///
/// # Examples
///
/// ```
/// use vaultflow::domain::result::Result;
/// use vaultflow::domain::errors::VaultFlowError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(VaultFlowError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, VaultFlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(VaultFlowError::Validation("test error".to_string()));
        assert!(result.is_err());
    }
}
