use async_trait::async_trait;
use futures::stream::BoxStream;
use log::debug;

use crate::device::types::HostEvent;
use crate::error::NfcError;

/// The NFC capability of the machine we run on.
///
/// `scan` starts listening for tags and hands back the stream of read events;
/// dropping the stream stops the scan. `write_text` writes a single text
/// record to the tag that is currently in range.
#[async_trait]
pub trait NfcHost: Send + Sync {
    fn is_available(&self) -> bool;

    async fn scan(&self) -> Result<BoxStream<'static, HostEvent>, NfcError>;

    async fn write_text(&self, text: &str) -> Result<(), NfcError>;
}

/// A host without any NFC hardware. The GUI falls back to simulated taps.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbsentHost;

#[async_trait]
impl NfcHost for AbsentHost {
    fn is_available(&self) -> bool {
        false
    }

    async fn scan(&self) -> Result<BoxStream<'static, HostEvent>, NfcError> {
        Err(NfcError::Unsupported)
    }

    async fn write_text(&self, text: &str) -> Result<(), NfcError> {
        debug!("Not writing {:?}, no NFC host", text);
        Err(NfcError::Unsupported)
    }
}
