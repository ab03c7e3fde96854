//! Scripted hosts for tests.

use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use futures::StreamExt;
use futures::channel::mpsc::{unbounded, UnboundedSender};
use futures::future::pending;
use futures::stream::BoxStream;

use crate::device::haptics::Haptics;
use crate::device::host::NfcHost;
use crate::device::types::HostEvent;
use crate::error::NfcError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteBehavior {
    Succeed,
    Fail,
    // never completes, to exercise the write deadline
    Hang,
}

/// An `NfcHost` whose scans only produce the events pushed with `emit`.
pub struct MockHost {
    available: bool,
    scan_failure: Option<String>,
    write_behavior: WriteBehavior,
    scan_calls: AtomicUsize,
    write_calls: AtomicUsize,
    writes: Mutex<Vec<String>>,
    events: Mutex<Option<UnboundedSender<HostEvent>>>,
}

impl MockHost {
    pub fn available() -> Self {
        MockHost {
            available: true,
            scan_failure: None,
            write_behavior: WriteBehavior::Succeed,
            scan_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
            writes: Mutex::new(Vec::new()),
            events: Mutex::new(None),
        }
    }

    pub fn unavailable() -> Self {
        MockHost { available: false, ..MockHost::available() }
    }

    /// `scan()` fails right away, like a denied NFC permission.
    pub fn with_scan_failure(mut self, reason: &str) -> Self {
        self.scan_failure = Some(reason.to_string());
        self
    }

    pub fn with_write_behavior(mut self, write_behavior: WriteBehavior) -> Self {
        self.write_behavior = write_behavior;
        self
    }

    /// Delivers `event` to the running scan. Returns false if nobody is scanning.
    pub fn emit(&self, event: HostEvent) -> bool {
        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        match events.as_ref() {
            Some(sender) => sender.unbounded_send(event).is_ok(),
            None => false,
        }
    }

    /// Ends the running scan without delivering an event.
    pub fn end_scan(&self) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    /// Number of write attempts, successful or not.
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Texts that were written successfully.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl NfcHost for MockHost {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn scan(&self) -> Result<BoxStream<'static, HostEvent>, NfcError> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);

        if !self.available {
            return Err(NfcError::Unsupported);
        }
        if let Some(reason) = &self.scan_failure {
            return Err(NfcError::ScanFailed { reason: reason.clone() });
        }

        let (sender, receiver) = unbounded();
        *self.events.lock().unwrap_or_else(PoisonError::into_inner) = Some(sender);
        Ok(receiver.boxed())
    }

    async fn write_text(&self, text: &str) -> Result<(), NfcError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);

        match self.write_behavior {
            WriteBehavior::Succeed => {
                self.writes.lock().unwrap_or_else(PoisonError::into_inner).push(text.to_string());
                Ok(())
            },
            WriteBehavior::Fail => Err(NfcError::ApduStatus { status: 0x6300 }),
            WriteBehavior::Hang => pending().await,
        }
    }
}

/// Remembers every vibration pattern.
#[derive(Default)]
pub struct RecordingHaptics {
    patterns: Mutex<Vec<Vec<u64>>>,
}

impl RecordingHaptics {
    pub fn patterns(&self) -> Vec<Vec<u64>> {
        self.patterns.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Haptics for RecordingHaptics {
    fn vibrate(&self, pattern: &[u64]) {
        self.patterns.lock().unwrap_or_else(PoisonError::into_inner).push(pattern.to_vec());
    }
}
