/// Decimal places kept on percentage-change metrics
pub const PERCENT_CHANGE_PRECISION: u32 = 3;

/// Literal inserted in place of the hidden middle of an account number
pub const MASK_LITERAL: &str = "***";

/// Identifiers shorter than this are shown as-is
pub const MASK_MIN_LENGTH: usize = 6;

/// Characters kept at the start of a masked identifier
pub const MASK_VISIBLE_PREFIX: usize = 4;

/// Characters kept at the end of a masked identifier
pub const MASK_VISIBLE_SUFFIX: usize = 2;

/// Inclusive bounds of the placeholder magnitude used when no real metric exists
pub const PLACEHOLDER_MIN: u32 = 10;
pub const PLACEHOLDER_MAX: u32 = 60;

/// Default deadline for a single storage fetch
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 10;

/// Storage spelling of the two sign indicators
pub const CREDIT_INDICATOR: &str = "CRDT";
pub const DEBIT_INDICATOR: &str = "DBIT";
