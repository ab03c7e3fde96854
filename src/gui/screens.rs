//! Which screen is visible, and when that changes.
//!
//! The orchestrator is a plain state machine: every input returns the effects (timers to
//! start, controller calls) the application has to carry out. Timer effects carry the number
//! of the nfc screen visit that requested them, results for an older visit are ignored.

use std::time::Duration;
use log::{debug, info};

use crate::config::types::SessionFlags;
use crate::device::types::ConnectionStatus;

/**
 * How long (milliseconds) the splash screen is shown.
 */
pub const SPLASH_DURATION: u64 = 1800;

/**
 * How long (milliseconds) after reaching the nfc screen the guide appears.
 */
pub const GUIDE_DELAY: u64 = 600;

/**
 * How long (milliseconds) the nfc screen takes to animate out after a badge connected.
 */
pub const EXIT_ANIMATION: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Splash,
    Nfc,
    Control,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ScheduleSplash(Duration),
    ScheduleGuide { after: Duration, visit: u64 },
    ScheduleExit { after: Duration, visit: u64 },
    StartScan,
    ResetConnection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenTiming {
    pub splash: Duration,
    pub guide_delay: Duration,
    // zero skips the exit animation
    pub exit_animation: Duration,
}

impl Default for ScreenTiming {
    fn default() -> Self {
        ScreenTiming {
            splash: Duration::from_millis(SPLASH_DURATION),
            guide_delay: Duration::from_millis(GUIDE_DELAY),
            exit_animation: Duration::from_millis(EXIT_ANIMATION),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScreenOrchestrator {
    screen: Screen,
    nfc_supported: bool,
    timing: ScreenTiming,
    session: SessionFlags,
    // incremented every time the nfc screen is entered
    visit: u64,
    exiting: bool,
    guide_visible: bool,
}

impl ScreenOrchestrator {
    pub fn new(nfc_supported: bool, session: SessionFlags, timing: ScreenTiming) -> Self {
        ScreenOrchestrator {
            screen: Screen::Splash,
            nfc_supported,
            timing,
            session,
            visit: 0,
            exiting: false,
            guide_visible: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> SessionFlags {
        self.session
    }

    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    pub fn guide_visible(&self) -> bool {
        self.guide_visible
    }

    pub fn start(&self) -> Vec<Effect> {
        vec![Effect::ScheduleSplash(self.timing.splash)]
    }

    pub fn splash_complete(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Splash {
            return vec![];
        }

        self.enter_nfc()
    }

    pub fn status_changed(&mut self, status: ConnectionStatus) -> Vec<Effect> {
        if self.screen != Screen::Nfc || self.exiting || status != ConnectionStatus::Connected {
            return vec![];
        }

        if self.timing.exit_animation.is_zero() {
            self.enter_control();
            return vec![];
        }

        self.exiting = true;
        vec![Effect::ScheduleExit { after: self.timing.exit_animation, visit: self.visit }]
    }

    pub fn exit_complete(&mut self, visit: u64) {
        if self.screen == Screen::Nfc && self.exiting && visit == self.visit {
            self.enter_control();
        } else {
            debug!("Ignoring stale exit animation of visit {}", visit);
        }
    }

    pub fn guide_delay_elapsed(&mut self, visit: u64) {
        if self.screen == Screen::Nfc && visit == self.visit && !self.exiting && !self.session.guide_seen() {
            info!("Showing guide");
            self.guide_visible = true;
        }
    }

    pub fn dismiss_guide(&mut self) {
        self.guide_visible = false;
        self.session.mark_guide_seen();
    }

    /// The user leaves the control screen to pair again.
    pub fn user_exit(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Control {
            return vec![];
        }

        // reset first, otherwise a still connected status sends us straight back
        let mut effects = vec![Effect::ResetConnection];
        effects.extend(self.enter_nfc());
        effects
    }

    fn enter_nfc(&mut self) -> Vec<Effect> {
        info!("Screen {:?} -> Nfc", self.screen);
        self.screen = Screen::Nfc;
        self.exiting = false;
        self.guide_visible = false;
        self.visit += 1;

        let mut effects = Vec::new();
        if self.nfc_supported {
            effects.push(Effect::StartScan);
        }
        if !self.session.guide_seen() {
            effects.push(Effect::ScheduleGuide { after: self.timing.guide_delay, visit: self.visit });
        }
        effects
    }

    fn enter_control(&mut self) {
        info!("Screen Nfc -> Control");
        self.screen = Screen::Control;
        self.exiting = false;
        self.guide_visible = false;
    }
}
