use std::sync::{Arc, Mutex, MutexGuard};
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::spawn;
use tokio::sync::watch;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

use crate::badge::types::StatusColor;
use crate::device::constants::{NfcTiming, PULSE_READ, PULSE_SIMULATED_TAP, PULSE_WRITE};
use crate::device::haptics::Haptics;
use crate::device::host::NfcHost;
use crate::device::types::{ConnectionStatus, HostEvent, WriteOutcome};
use crate::error::NfcError;

struct Session {
    // cancelled by reset_connection() or when a new scan/tap replaces this one
    cancel: CancellationToken,
    // a hardware scan is running, so there is a tag session to write to
    live: bool,
}

struct Inner {
    host: Arc<dyn NfcHost>,
    haptics: Arc<dyn Haptics>,
    supported: bool,
    timing: NfcTiming,
    app_cancel: CancellationToken,
    status: watch::Sender<ConnectionStatus>,
    session: Mutex<Session>,
}

/// Owns the connection status and drives the host NFC API (or the simulated tap).
///
/// Cheap to clone; all clones share the same status. Every background wait is a child of the
/// cancellation token passed to `new`, so cancelling that token tears everything down.
#[derive(Clone)]
pub struct NfcController {
    inner: Arc<Inner>,
}

impl NfcController {
    pub fn new(host: Arc<dyn NfcHost>, haptics: Arc<dyn Haptics>, app_cancel: CancellationToken) -> Self {
        Self::with_timing(host, haptics, app_cancel, NfcTiming::default())
    }

    pub fn with_timing(
        host: Arc<dyn NfcHost>,
        haptics: Arc<dyn Haptics>,
        app_cancel: CancellationToken,
        timing: NfcTiming,
    ) -> Self {
        let supported = host.is_available();
        info!("NFC supported: {}", supported);

        let (status, _) = watch::channel(ConnectionStatus::Idle);
        let session = Session { cancel: app_cancel.child_token(), live: false };

        NfcController {
            inner: Arc::new(Inner {
                host,
                haptics,
                supported,
                timing,
                app_cancel,
                status,
                session: Mutex::new(session),
            }),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.inner.supported
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.inner.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.inner.status.subscribe()
    }

    /// Starts listening for a single tag read. Does nothing if the host has no NFC.
    pub async fn start_scan(&self) {
        if !self.inner.supported {
            debug!("Not scanning, NFC is not supported");
            return;
        }

        let cancel = self.begin_session();

        let mut events = match self.inner.host.scan().await {
            Ok(events) => events,
            Err(err) => {
                warn!("Scanning failed {:?}", err);
                self.inner.set_status_unless_cancelled(&cancel, ConnectionStatus::Error);
                return;
            },
        };

        if cancel.is_cancelled() {
            debug!("Scan was reset while starting");
            return;
        }
        self.set_session_live(&cancel);

        let inner = self.inner.clone();
        spawn(async move {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!("Scan cancelled");
                },
                event = events.next() => match event {
                    Some(HostEvent::Reading(tag)) => {
                        info!("Read tag {}", tag.uid.as_deref().unwrap_or("(no uid)"));
                        if inner.set_status_unless_cancelled(&cancel, ConnectionStatus::Connected) {
                            inner.haptics.vibrate(&PULSE_READ);
                        }
                    },
                    Some(HostEvent::ReadingError(reason)) => {
                        warn!("Reading tag failed: {}", reason);
                        inner.set_status_unless_cancelled(&cancel, ConnectionStatus::Error);
                    },
                    None => {
                        warn!("Scan ended without reading a tag");
                        inner.set_status_unless_cancelled(&cancel, ConnectionStatus::Error);
                    },
                },
            }
        });
    }

    /// Pretends a badge was tapped: scanning now, connected after a fixed delay. Never fails.
    pub fn simulate_tap(&self) {
        let cancel = self.begin_session();
        self.inner.haptics.vibrate(&PULSE_SIMULATED_TAP);

        let inner = self.inner.clone();
        let delay = self.inner.timing.simulated_tap_delay;
        spawn(async move {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!("Simulated tap cancelled");
                },
                _ = sleep(delay) => {
                    if inner.set_status_unless_cancelled(&cancel, ConnectionStatus::Connected) {
                        inner.haptics.vibrate(&PULSE_READ);
                    }
                },
            }
        });
    }

    /// Writes `color` to the badge when there is a live scan session.
    ///
    /// This always completes: write errors are logged and reported through the returned
    /// `WriteOutcome` only, the caller shows its confirmation regardless.
    pub async fn write_color(&self, color: StatusColor) -> WriteOutcome {
        self.inner.haptics.vibrate(&PULSE_WRITE);

        if !self.inner.supported || !self.session_live() {
            debug!("Skipping write of {}, no NFC session", color);
            return WriteOutcome::Skipped;
        }

        let deadline = self.inner.timing.write_deadline;
        match timeout(deadline, self.inner.host.write_text(color.record_text())).await {
            Ok(Ok(())) => {
                info!("Wrote {} to badge", color);
                WriteOutcome::Written
            },
            Ok(Err(err)) => {
                warn!("Failed to write {} to badge: {:?}", color, err);
                WriteOutcome::Failed(err.to_string())
            },
            Err(_) => {
                warn!("Writing {} to badge took too long", color);
                WriteOutcome::Failed(NfcError::WriteTimeout.to_string())
            },
        }
    }

    /// Back to idle, dropping the current scan or pending simulated tap.
    pub fn reset_connection(&self) {
        let mut session = self.inner.lock_session();
        session.cancel.cancel();
        session.cancel = self.inner.app_cancel.child_token();
        session.live = false;
        self.inner.set_status(ConnectionStatus::Idle);
    }

    // Scanning is published under the same lock, so a concurrent reset either precedes it or wins
    fn begin_session(&self) -> CancellationToken {
        let mut session = self.inner.lock_session();
        session.cancel.cancel();
        session.cancel = self.inner.app_cancel.child_token();
        session.live = false;
        self.inner.set_status(ConnectionStatus::Scanning);
        session.cancel.clone()
    }

    fn set_session_live(&self, cancel: &CancellationToken) {
        let mut session = self.inner.lock_session();
        if !cancel.is_cancelled() {
            session.live = true;
        }
    }

    fn session_live(&self) -> bool {
        let session = self.inner.lock_session();
        session.live && !session.cancel.is_cancelled()
    }
}

impl Inner {
    fn lock_session(&self) -> MutexGuard<'_, Session> {
        // a panic while holding the lock cannot leave Session half updated
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_status(&self, status: ConnectionStatus) {
        self.status.send_if_modified(|current| {
            if *current == status {
                return false;
            }

            info!("NFC status {} -> {}", current, status);
            *current = status;
            true
        });
    }

    // transitions from background tasks must not undo a reset that happened meanwhile
    fn set_status_unless_cancelled(&self, cancel: &CancellationToken, status: ConnectionStatus) -> bool {
        let _session = self.lock_session();
        if cancel.is_cancelled() {
            debug!("Ignoring status {} from a stale session", status);
            return false;
        }
        self.set_status(status);
        true
    }
}
