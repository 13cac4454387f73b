//! Address format validation

/// Check whether a string is a well-formed field-element address
///
/// Valid addresses are `0x`-prefixed hexadecimal with 1 to 64 digits. This
/// is a format check only; it says nothing about whether the address is
/// deployed or funded on any network.
pub fn is_valid_address(address: &str) -> bool {
    let Some(digits) = address.strip_prefix("0x") else {
        return false;
    };
    !digits.is_empty()
        && digits.len() <= 64
        && digits.chars().all(|c| c.is_ascii_hexdigit())
}
