use std::time::Duration;

/**
 * How long (milliseconds) a simulated tap stays in the scanning state before it connects.
 */
pub const SIMULATED_TAP_DELAY: u64 = 1200;

/**
 * How long (milliseconds) a write to a tag may take.
 */
pub const WRITE_DEADLINE: u64 = 2000;

/**
 * How often (milliseconds) the PC/SC host polls the reader for a card while scanning.
 */
pub const CARD_POLL_DELAY: u64 = 250;

/**
 * Vibration pattern (milliseconds on/off/on...) played when a tag has been read.
 */
pub const PULSE_READ: [u64; 1] = [50];

/**
 * Vibration pattern played when the user taps the NFC icon to simulate a badge.
 */
pub const PULSE_SIMULATED_TAP: [u64; 3] = [30, 50, 30];

/**
 * Vibration pattern played before writing a color.
 */
pub const PULSE_WRITE: [u64; 1] = [50];

/**
 * First user memory page of NTAG21x / Ultralight tags.
 */
pub const TAG_USER_PAGE_START: u8 = 4;

/**
 * Bytes per page of NTAG21x / Ultralight tags.
 */
pub const TAG_PAGE_SIZE: usize = 4;

/**
 * Language code of the text records we write.
 */
pub const TEXT_RECORD_LANGUAGE: &str = "en";

pub const APDU_GET_UID: [u8; 5] = [0xFF, 0xCA, 0x00, 0x00, 0x00];
pub const APDU_STATUS_OK: u16 = 0x9000;

/// Delays used by `NfcController`. Tests shorten or inspect these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NfcTiming {
    pub simulated_tap_delay: Duration,
    pub write_deadline: Duration,
}

impl Default for NfcTiming {
    fn default() -> Self {
        NfcTiming {
            simulated_tap_delay: Duration::from_millis(SIMULATED_TAP_DELAY),
            write_deadline: Duration::from_millis(WRITE_DEADLINE),
        }
    }
}
