//! Revert reason decoding for `Error(string)` payloads

use crate::codec::decode_hex;

/// `0x` plus keccak256("Error(string)")[..4]
const ERROR_SELECTOR: &str = "0x08c379a0";
/// Hex digits per ABI word
const WORD: usize = 64;

/// Decode the reason string of a standard revert payload
///
/// The payload must be `0x`-prefixed, start with the `Error(string)`
/// selector and consist of whole ABI words after it. Anything else, including
/// an offset or length pointing past the end, yields `None`.
pub fn decode_revert_reason(payload: &str) -> Option<String> {
    let selector_len = ERROR_SELECTOR.len();
    if payload.len() % WORD != selector_len {
        return None;
    }
    if !payload.is_char_boundary(selector_len)
        || !payload[..selector_len].eq_ignore_ascii_case(ERROR_SELECTOR)
    {
        return None;
    }

    let offset = read_word(payload, selector_len)?;
    let len = read_word(payload, selector_len + WORD)?;

    let start = selector_len.checked_add(offset.checked_mul(2)?)?.checked_add(WORD)?;
    let end = start.checked_add(len.checked_mul(2)?)?;
    let bytes = decode_hex(payload.get(start..end)?).ok()?;

    Some(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_word(payload: &str, at: usize) -> Option<usize> {
    let word = payload.get(at..at + WORD)?;
    // Words above usize range cannot point inside the payload anyway
    let significant = word.trim_start_matches('0');
    if significant.len() > 16 {
        return None;
    }
    if significant.is_empty() {
        return Some(0);
    }
    u64::from_str_radix(significant, 16)
        .ok()
        .and_then(|value| usize::try_from(value).ok())
}
