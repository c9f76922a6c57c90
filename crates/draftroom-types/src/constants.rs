//! System-wide constants for the Draftroom engine.

use rust_decimal::Decimal;

/// Sealing key length in bytes (AES-256).
pub const SEAL_KEY_LEN: usize = 32;

/// Sealing nonce length in bytes (one fresh random nonce per seal call).
pub const SEAL_NONCE_LEN: usize = 16;

/// Authentication tag length in bytes.
pub const SEAL_TAG_LEN: usize = 16;

/// Charged amount for forced allocations when no regular allocation exists
/// to average over.
pub const FALLBACK_DEFAULT_AMOUNT: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Global minimum bid, independent of phase.
pub const DEFAULT_MIN_BID: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Default contract length in seasons.
pub const DEFAULT_CONTRACT_DURATION_SEASONS: u32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_sane() {
        assert_eq!(SEAL_KEY_LEN, 32);
        assert_eq!(SEAL_NONCE_LEN, 16);
        assert_eq!(SEAL_TAG_LEN, 16);
        assert_eq!(FALLBACK_DEFAULT_AMOUNT, Decimal::new(1000, 0));
        assert_eq!(DEFAULT_MIN_BID, Decimal::new(10, 0));
    }
}
