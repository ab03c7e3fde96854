//! PC/SC pseudo APDUs understood by common contactless readers (ACR122U and friends).

use crate::device::constants::{APDU_STATUS_OK, TAG_PAGE_SIZE};
use crate::error::NfcError;

/// `UPDATE BINARY` of a single tag page.
pub fn update_binary(page: u8, data: &[u8; TAG_PAGE_SIZE]) -> [u8; 5 + TAG_PAGE_SIZE] {
    let mut apdu = [0u8; 5 + TAG_PAGE_SIZE];
    apdu[..5].copy_from_slice(&[0xFF, 0xD6, 0x00, page, TAG_PAGE_SIZE as u8]);
    apdu[5..].copy_from_slice(data);
    apdu
}

/// The trailing SW1 SW2 of a response.
pub fn status_word(response: &[u8]) -> Option<u16> {
    match response {
        [.., sw1, sw2] => Some(u16::from_be_bytes([*sw1, *sw2])),
        _ => None,
    }
}

/// Splits a response into its data, failing unless the status is `90 00`.
pub fn check_response(response: &[u8]) -> Result<&[u8], NfcError> {
    match status_word(response) {
        Some(APDU_STATUS_OK) => Ok(&response[..response.len() - 2]),
        Some(status) => Err(NfcError::ApduStatus { status }),
        None => Err(NfcError::ApduStatus { status: 0 }),
    }
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{:02X}", byte)).collect()
}
