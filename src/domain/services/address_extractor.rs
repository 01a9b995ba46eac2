//! Finds the Namada recipient address embedded in a donation memo

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32m, Hrp};

use crate::utils::logging;

/// Human-readable part every accepted address must decode to
pub const NAMADA_PREFIX: &str = "tnam";

/// Longest string accepted as a bech32 address
const MAX_ADDRESS_LENGTH: usize = 90;

/// Extracts Namada addresses from free-text transaction memos
pub struct AddressExtractor;

impl AddressExtractor {
    /// Return the first checksum-valid `tnam` address in `message`, or an
    /// empty string when there is none.
    ///
    /// Candidates are scanned left to right; a candidate that fails to decode
    /// is skipped, so a valid address after a malformed one is still found.
    /// This never fails: anything unexpected is reported at debug level and
    /// treated as "no key".
    pub fn extract_namada_key(message: &str) -> String {
        Self::candidates(message)
            .into_iter()
            .find(|candidate| Self::is_valid_namada_address(candidate))
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Whether `address` is a bech32m string whose human-readable part is `tnam`
    pub fn is_valid_namada_address(address: &str) -> bool {
        if address.len() > MAX_ADDRESS_LENGTH {
            logging::log_debug(&format!(
                "[extractor] Rejecting {}-character candidate: too long",
                address.len()
            ));
            return false;
        }

        match CheckedHrpstring::new::<Bech32m>(address) {
            Ok(checked) => checked.hrp() == Hrp::parse_unchecked(NAMADA_PREFIX),
            Err(e) => {
                logging::log_debug(&format!(
                    "[extractor] Rejecting candidate {}: {}",
                    address, e
                ));
                false
            }
        }
    }

    /// Non-overlapping substrings of `message` made of the `tnam` prefix and
    /// one or more ASCII alphanumerics, in order of appearance.
    fn candidates(message: &str) -> Vec<&str> {
        let bytes = message.as_bytes();
        let mut found = Vec::new();
        let mut cursor = 0;

        while let Some(offset) = message[cursor..].find(NAMADA_PREFIX) {
            let start = cursor + offset;
            let body_start = start + NAMADA_PREFIX.len();
            let end = bytes[body_start..]
                .iter()
                .position(|b| !b.is_ascii_alphanumeric())
                .map_or(bytes.len(), |len| body_start + len);

            if end > body_start {
                found.push(&message[start..end]);
            }
            cursor = end;
        }

        found
    }
}
