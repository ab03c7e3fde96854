//! Encoding of the single NDEF text record we write to badges, laid out the
//! way NFC Forum Type 2 tags (NTAG21x, Ultralight) store it.

use crate::device::constants::TAG_PAGE_SIZE;
use crate::error::NfcError;

const HEADER_MB: u8 = 0x80;
const HEADER_ME: u8 = 0x40;
const HEADER_SR: u8 = 0x10;
const TNF_WELL_KNOWN: u8 = 0x01;
const RECORD_TYPE_TEXT: u8 = b'T';

const TLV_NDEF_MESSAGE: u8 = 0x03;
const TLV_TERMINATOR: u8 = 0xFE;
// lengths from 0xFF up use the three byte format
const TLV_LONG_LENGTH: u8 = 0xFF;
const TLV_MAX_LENGTH: usize = 0xFFFE;

/// A message consisting of a single well-known text record, UTF-8 encoded.
pub fn text_record(text: &str, language: &str) -> Vec<u8> {
    // the status byte only has 6 bits for the language length
    let language = &language.as_bytes()[..language.len().min(0x3F)];
    let payload_len = 1 + language.len() + text.len();

    let mut record = Vec::with_capacity(payload_len + 7);
    if payload_len <= u8::MAX as usize {
        record.push(HEADER_MB | HEADER_ME | HEADER_SR | TNF_WELL_KNOWN);
        record.push(1); // type length
        record.push(payload_len as u8);
    } else {
        record.push(HEADER_MB | HEADER_ME | TNF_WELL_KNOWN);
        record.push(1);
        record.extend_from_slice(&(payload_len as u32).to_be_bytes());
    }
    record.push(RECORD_TYPE_TEXT);

    // bit 7 clear: UTF-8
    record.push(language.len() as u8);
    record.extend_from_slice(language);
    record.extend_from_slice(text.as_bytes());
    record
}

/// Wraps an NDEF message in the TLV block tags expect in their user memory.
pub fn message_tlv(message: &[u8]) -> Result<Vec<u8>, NfcError> {
    let length = message.len();
    if length > TLV_MAX_LENGTH {
        return Err(NfcError::PayloadTooLarge { length });
    }

    let mut tlv = Vec::with_capacity(length + 5);
    tlv.push(TLV_NDEF_MESSAGE);
    if length < TLV_LONG_LENGTH as usize {
        tlv.push(length as u8);
    } else {
        tlv.push(TLV_LONG_LENGTH);
        tlv.extend_from_slice(&(length as u16).to_be_bytes());
    }
    tlv.extend_from_slice(message);
    tlv.push(TLV_TERMINATOR);
    Ok(tlv)
}

/// Splits `bytes` into tag pages, zero padding the last one.
pub fn into_pages(bytes: &[u8]) -> Vec<[u8; TAG_PAGE_SIZE]> {
    bytes
        .chunks(TAG_PAGE_SIZE)
        .map(|chunk| {
            let mut page = [0u8; TAG_PAGE_SIZE];
            page[..chunk.len()].copy_from_slice(chunk);
            page
        })
        .collect()
}

/// Everything needed to store `text` on a tag, page by page.
pub fn text_record_pages(text: &str, language: &str) -> Result<Vec<[u8; TAG_PAGE_SIZE]>, NfcError> {
    let tlv = message_tlv(&text_record(text, language))?;
    Ok(into_pages(&tlv))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_record_layout() {
        let record = text_record("green", "en");
        assert_eq!(
            record,
            vec![0xD1, 0x01, 0x08, b'T', 0x02, b'e', b'n', b'g', b'r', b'e', b'e', b'n'],
        );
    }

    #[test]
    fn long_text_record_uses_four_byte_length() {
        let text = "x".repeat(300);
        let record = text_record(&text, "en");

        assert_eq!(record[0], 0xC1);
        assert_eq!(record[1], 0x01);
        assert_eq!(&record[2..6], &303u32.to_be_bytes());
        assert_eq!(record[6], b'T');
        assert_eq!(record.len(), 7 + 303);
    }

    #[test]
    fn tlv_wraps_message_with_terminator() {
        let tlv = message_tlv(&[1, 2, 3]).unwrap();
        assert_eq!(tlv, vec![0x03, 0x03, 1, 2, 3, 0xFE]);
    }

    #[test]
    fn tlv_switches_to_three_byte_length() {
        let message = vec![0xAA; 0xFF];
        let tlv = message_tlv(&message).unwrap();

        assert_eq!(&tlv[..4], &[0x03, 0xFF, 0x00, 0xFF]);
        assert_eq!(tlv.last(), Some(&0xFE));
        assert_eq!(tlv.len(), 4 + 0xFF + 1);
    }

    #[test]
    fn tlv_rejects_oversized_message() {
        let message = vec![0; 0x1_0000];
        assert!(matches!(
            message_tlv(&message),
            Err(NfcError::PayloadTooLarge { length: 0x1_0000 }),
        ));
    }

    #[test]
    fn pages_are_zero_padded() {
        let pages = text_record_pages("green", "en").unwrap();

        // 2 byte TLV header + 12 byte record + terminator = 15 bytes
        assert_eq!(pages.len(), 4);
        assert_eq!(pages[0], [0x03, 0x0C, 0xD1, 0x01]);
        assert_eq!(pages[3], [b'e', b'n', 0xFE, 0x00]);
    }
}
