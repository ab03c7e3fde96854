use std::ffi::{CStr, CString};
use std::thread;
use std::time::Duration;
use async_trait::async_trait;
use futures::StreamExt;
use futures::channel::mpsc::{unbounded, UnboundedSender};
use futures::stream::BoxStream;
use log::{debug, info, warn};
use pcsc::{Card, Context, Protocols, Scope, ShareMode, MAX_BUFFER_SIZE};
use tokio::task::spawn_blocking;

use crate::device::apdu::{check_response, to_hex, update_binary};
use crate::device::constants::{APDU_GET_UID, CARD_POLL_DELAY, TAG_USER_PAGE_START, TEXT_RECORD_LANGUAGE};
use crate::device::host::NfcHost;
use crate::device::ndef::text_record_pages;
use crate::device::types::{HostEvent, TagInfo};
use crate::error::NfcError;

/// NFC through a PC/SC contactless reader, writing NTAG21x / Ultralight badges.
pub struct PcscHost {
    context: Context,
    reader: CString,
}

impl PcscHost {
    /// Uses the first reader whose name contains `reader_name`, or the first reader at all.
    pub fn open(reader_name: Option<&str>) -> Result<Self, NfcError> {
        let context = Context::establish(Scope::User)?;
        let readers = context.list_readers_owned()?;

        let reader = readers
            .into_iter()
            .find(|reader| match reader_name {
                None => true,
                Some(name) => reader.to_string_lossy().contains(name),
            })
            .ok_or(NfcError::Unsupported)?;

        info!("Using NFC reader {}", reader.to_string_lossy());
        Ok(PcscHost { context, reader })
    }
}

fn connect(context: &Context, reader: &CStr) -> Result<Card, NfcError> {
    match context.connect(reader, ShareMode::Shared, Protocols::ANY) {
        Ok(card) => Ok(card),
        Err(pcsc::Error::NoSmartcard) | Err(pcsc::Error::RemovedCard) => Err(NfcError::NoTag),
        Err(err) => Err(err.into()),
    }
}

fn read_uid(card: &Card) -> Result<TagInfo, NfcError> {
    let mut buffer = [0u8; MAX_BUFFER_SIZE];
    let response = card.transmit(&APDU_GET_UID, &mut buffer)?;
    let uid = check_response(response)?;
    Ok(TagInfo { uid: Some(to_hex(uid)) })
}

// blocks until a tag shows up, the reader fails, or the receiving side is dropped
fn wait_for_tag(context: Context, reader: CString, sender: UnboundedSender<HostEvent>) {
    loop {
        if sender.is_closed() {
            debug!("Scan stream dropped, stop polling reader");
            return;
        }

        let event = match connect(&context, &reader) {
            Err(NfcError::NoTag) => {
                thread::sleep(Duration::from_millis(CARD_POLL_DELAY));
                continue;
            },
            Err(err) => HostEvent::ReadingError(err.to_string()),
            Ok(card) => match read_uid(&card) {
                Ok(tag) => HostEvent::Reading(tag),
                Err(err) => HostEvent::ReadingError(err.to_string()),
            },
        };

        if sender.unbounded_send(event).is_err() {
            debug!("Scan stream dropped before the tag event was delivered");
        }
        return;
    }
}

fn write_pages(context: &Context, reader: &CStr, text: &str) -> Result<(), NfcError> {
    let pages = text_record_pages(text, TEXT_RECORD_LANGUAGE)?;
    let card = connect(context, reader)?;
    let mut buffer = [0u8; MAX_BUFFER_SIZE];

    for (index, page) in pages.iter().enumerate() {
        let page_number = u8::try_from(index)
            .ok()
            .and_then(|index| index.checked_add(TAG_USER_PAGE_START))
            .ok_or(NfcError::PayloadTooLarge { length: pages.len() * page.len() })?;

        let response = card.transmit(&update_binary(page_number, page), &mut buffer)?;
        check_response(response)?;
    }

    Ok(())
}

#[async_trait]
impl NfcHost for PcscHost {
    fn is_available(&self) -> bool {
        true
    }

    async fn scan(&self) -> Result<BoxStream<'static, HostEvent>, NfcError> {
        // fail now rather than from the polling thread when the reader is gone
        let readers = self.context.list_readers_owned()?;
        if !readers.contains(&self.reader) {
            return Err(NfcError::ScanFailed {
                reason: format!("reader {} disappeared", self.reader.to_string_lossy()),
            });
        }

        let (sender, receiver) = unbounded();
        let context = self.context.clone();
        let reader = self.reader.clone();
        spawn_blocking(move || wait_for_tag(context, reader, sender));

        Ok(receiver.boxed())
    }

    async fn write_text(&self, text: &str) -> Result<(), NfcError> {
        let context = self.context.clone();
        let reader = self.reader.clone();
        let text = text.to_string();

        let result = spawn_blocking(move || write_pages(&context, &reader, &text)).await?;
        if let Err(err) = &result {
            warn!("Writing text record failed: {}", err);
        }
        result
    }
}
