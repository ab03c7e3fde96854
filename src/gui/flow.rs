//! Glue between the screen orchestrator and the NFC controller.
//!
//! Effects that must happen before anything else (resetting the connection) are applied here;
//! the ones that need the async runtime (timers, starting a scan) are handed back to the caller.

use log::debug;

use crate::config::types::SessionFlags;
use crate::device::controller::NfcController;
use crate::device::types::ConnectionStatus;
use crate::gui::screens::{Effect, Screen, ScreenOrchestrator, ScreenTiming};

/// What pressing the NFC icon should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    Simulate,
    Scan,
    Ignore,
}

pub struct ScreenFlow {
    controller: NfcController,
    screens: ScreenOrchestrator,
    latest_status: ConnectionStatus,
}

impl ScreenFlow {
    pub fn new(controller: NfcController, session: SessionFlags, timing: ScreenTiming) -> Self {
        let screens = ScreenOrchestrator::new(controller.is_supported(), session, timing);
        let latest_status = controller.status();

        ScreenFlow { controller, screens, latest_status }
    }

    pub fn controller(&self) -> &NfcController {
        &self.controller
    }

    pub fn screens(&self) -> &ScreenOrchestrator {
        &self.screens
    }

    pub fn screen(&self) -> Screen {
        self.screens.screen()
    }

    pub fn latest_status(&self) -> ConnectionStatus {
        self.latest_status
    }

    pub fn start(&self) -> Vec<Effect> {
        self.screens.start()
    }

    pub fn splash_complete(&mut self) -> Vec<Effect> {
        let effects = self.screens.splash_complete();
        self.apply(effects)
    }

    /// A status notification arrived. It may be older than a reset that happened since, so
    /// the controller's current status is used instead of the notified one.
    pub fn status_changed(&mut self) -> Vec<Effect> {
        self.latest_status = self.controller.status();
        let effects = self.screens.status_changed(self.latest_status);
        self.apply(effects)
    }

    pub fn exit_complete(&mut self, visit: u64) {
        self.screens.exit_complete(visit);
    }

    pub fn guide_delay_elapsed(&mut self, visit: u64) {
        self.screens.guide_delay_elapsed(visit);
    }

    pub fn dismiss_guide(&mut self) {
        self.screens.dismiss_guide();
    }

    pub fn user_exit(&mut self) -> Vec<Effect> {
        let effects = self.screens.user_exit();
        let deferred = self.apply(effects);
        self.latest_status = self.controller.status();
        deferred
    }

    pub fn tap(&self) -> TapAction {
        if !self.controller.is_supported() {
            return TapAction::Simulate;
        }

        // with real NFC the scan is already running, unless it failed and the user retries
        match self.latest_status {
            ConnectionStatus::Idle | ConnectionStatus::Error => TapAction::Scan,
            ConnectionStatus::Scanning | ConnectionStatus::Connected => TapAction::Ignore,
        }
    }

    // resets happen right away, so that they precede a StartScan of the same batch
    fn apply(&self, effects: Vec<Effect>) -> Vec<Effect> {
        let mut deferred = Vec::with_capacity(effects.len());

        for effect in effects {
            match effect {
                Effect::ResetConnection => {
                    debug!("Resetting connection");
                    self.controller.reset_connection();
                },
                other => deferred.push(other),
            }
        }

        deferred
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use rstest::rstest;
    use tokio_util::sync::CancellationToken;
    use crate::device::mock::{MockHost, RecordingHaptics};

    fn flow(host: MockHost) -> ScreenFlow {
        let controller = NfcController::new(
            Arc::new(host),
            Arc::new(RecordingHaptics::default()),
            CancellationToken::new(),
        );
        ScreenFlow::new(controller, SessionFlags::default(), ScreenTiming::default())
    }

    #[test]
    fn reset_is_applied_not_returned() {
        let flow = flow(MockHost::available());
        let deferred = flow.apply(vec![Effect::ResetConnection, Effect::StartScan]);
        assert_eq!(deferred, vec![Effect::StartScan]);
    }

    #[test]
    fn unsupported_tap_simulates() {
        assert_eq!(flow(MockHost::unavailable()).tap(), TapAction::Simulate);
    }

    #[rstest]
    #[case(ConnectionStatus::Idle, TapAction::Scan)]
    #[case(ConnectionStatus::Error, TapAction::Scan)]
    #[case(ConnectionStatus::Scanning, TapAction::Ignore)]
    #[case(ConnectionStatus::Connected, TapAction::Ignore)]
    fn supported_tap_rescans_only_when_stopped(#[case] status: ConnectionStatus, #[case] expected: TapAction) {
        let mut flow = flow(MockHost::available());
        flow.latest_status = status;
        assert_eq!(flow.tap(), expected);
    }
}
