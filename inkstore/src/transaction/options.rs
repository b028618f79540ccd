use crate::common::DEFAULT_MAX_RETRIES;

/// Options for controlling a transaction.
///
/// # Examples
///
/// ```rust,ignore
/// use inkstore::transaction::TransactionOptions;
///
/// // Start from an empty document when the id does not exist yet
/// let options = TransactionOptions::read_or_create();
///
/// // Custom options
/// let options = TransactionOptions::new(true, true, 10);
/// ```
#[derive(Clone, Debug)]
pub struct TransactionOptions {
    create_if_missing: bool,
    apply_timestamps: bool,
    max_retries: u32,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        TransactionOptions {
            create_if_missing: false,
            apply_timestamps: false,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl TransactionOptions {
    /// Creates new `TransactionOptions` with the specified behavior.
    ///
    /// # Arguments
    ///
    /// * `create_if_missing` - If true, start from an empty document when
    ///   the id does not exist instead of failing
    /// * `apply_timestamps` - If true, maintain `created_at`/`updated_at`
    /// * `max_retries` - Bound on conflict-retry attempts. The retry budget
    ///   is always finite; unbounded retry hides contention problems.
    pub fn new(create_if_missing: bool, apply_timestamps: bool, max_retries: u32) -> Self {
        TransactionOptions {
            create_if_missing,
            apply_timestamps,
            max_retries,
        }
    }

    /// Returns whether a missing document is created instead of failing.
    pub fn is_create_if_missing(&self) -> bool {
        self.create_if_missing
    }

    /// Returns whether timestamps are maintained.
    pub fn is_apply_timestamps(&self) -> bool {
        self.apply_timestamps
    }

    /// Returns the conflict-retry budget.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Creates `TransactionOptions` that start from an empty document when the
/// id does not exist, with the default retry budget.
pub fn read_or_create() -> TransactionOptions {
    TransactionOptions::new(true, false, DEFAULT_MAX_RETRIES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let options = TransactionOptions::default();
        assert!(!options.is_create_if_missing());
        assert!(!options.is_apply_timestamps());
        assert_eq!(options.max_retries(), DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_options_new() {
        let options = TransactionOptions::new(true, true, 3);
        assert!(options.is_create_if_missing());
        assert!(options.is_apply_timestamps());
        assert_eq!(options.max_retries(), 3);
    }

    #[test]
    fn test_read_or_create() {
        let options = read_or_create();
        assert!(options.is_create_if_missing());
        assert!(!options.is_apply_timestamps());
    }
}
