use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const SUFFIX_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const TIMESTAMP_DIGITS: usize = 8;
const SUFFIX_LEN: usize = 4;

pub const TRANSFER_PREFIX: &str = "SPEI";
pub const PAYMENT_PREFIX: &str = "PAY";

/// Synthetic folio handed out on a successful transfer or payment.
///
/// Shape: `{PREFIX}-{last 8 digits of epoch millis}-{4 chars of [A-Z0-9]}`. Uniqueness is
/// only as good as the random suffix; it is not a ledger reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    pub fn generate<R: Rng + ?Sized>(prefix: &str, epoch_millis: i64, rng: &mut R) -> Self {
        let trailing = epoch_millis.unsigned_abs() % 10u64.pow(TIMESTAMP_DIGITS as u32);
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        Self(format!(
            "{prefix}-{trailing:0width$}-{suffix}",
            width = TIMESTAMP_DIGITS
        ))
    }

    /// Generates a folio from the wall clock and the thread-local RNG.
    pub fn issue(prefix: &str) -> Self {
        Self::generate(
            prefix,
            Utc::now().timestamp_millis(),
            &mut rand::thread_rng(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn prefix(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }

    pub fn is_well_formed(code: &str, prefix: &str) -> bool {
        let mut parts = code.splitn(3, '-');
        let (Some(head), Some(stamp), Some(suffix)) = (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };

        head == prefix
            && stamp.len() == TIMESTAMP_DIGITS
            && stamp.bytes().all(|b| b.is_ascii_digit())
            && suffix.len() == SUFFIX_LEN
            && suffix
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn keeps_last_eight_timestamp_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        let code = ConfirmationCode::generate(TRANSFER_PREFIX, 1_770_912_345_678, &mut rng);
        assert!(code.as_str().starts_with("SPEI-12345678-"));
        assert_eq!(code.prefix(), "SPEI");
    }

    #[test]
    fn pads_short_timestamps() {
        let mut rng = StdRng::seed_from_u64(1);
        let code = ConfirmationCode::generate(PAYMENT_PREFIX, 1_700_000_000_042, &mut rng);
        assert!(code.as_str().starts_with("PAY-00000042-"));
        assert!(ConfirmationCode::is_well_formed(code.as_str(), PAYMENT_PREFIX));
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!(!ConfirmationCode::is_well_formed("SPEI-1234567-ABCD", "SPEI"));
        assert!(!ConfirmationCode::is_well_formed("SPEI-12345678-abcd", "SPEI"));
        assert!(!ConfirmationCode::is_well_formed("PAY-12345678-ABCD", "SPEI"));
        assert!(!ConfirmationCode::is_well_formed("SPEI-12345678", "SPEI"));
        assert!(ConfirmationCode::is_well_formed("SPEI-12345678-A1B2", "SPEI"));
    }

    proptest! {
        #[test]
        fn generated_codes_are_well_formed(millis in 0i64..4_102_444_800_000, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            for prefix in [TRANSFER_PREFIX, PAYMENT_PREFIX] {
                let code = ConfirmationCode::generate(prefix, millis, &mut rng);
                prop_assert!(ConfirmationCode::is_well_formed(code.as_str(), prefix));
            }
        }
    }
}
