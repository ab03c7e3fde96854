use std::time::Duration;
use log::debug;

use crate::badge::types::StatusColor;

/**
 * How long (milliseconds) the "Badge updated" confirmation stays visible.
 */
pub const CONFIRMATION_DURATION: u64 = 2000;

/// State of the control screen: the picked color and the sync prompt / confirmation around it.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeControl {
    selected: StatusColor,
    slider_value: u8,
    has_changed: bool,
    syncing: bool,
    confirmation: Option<u64>,
    // incremented for every confirmation, so an old dismiss timer cannot hide a newer one
    confirmation_counter: u64,
    // incremented by reset(), sync results are tagged with it
    visit: u64,
}

impl Default for BadgeControl {
    fn default() -> Self {
        BadgeControl {
            selected: StatusColor::default(),
            slider_value: StatusColor::default().slider_position(),
            has_changed: false,
            syncing: false,
            confirmation: None,
            confirmation_counter: 0,
            visit: 0,
        }
    }
}

impl BadgeControl {
    /// Starts over for a new control screen visit. Counters keep running, so results and
    /// timers of the previous visit stay recognisable as stale.
    pub fn reset(&mut self) {
        *self = BadgeControl {
            confirmation_counter: self.confirmation_counter,
            visit: self.visit + 1,
            ..BadgeControl::default()
        };
    }

    pub fn visit(&self) -> u64 {
        self.visit
    }

    pub fn selected(&self) -> StatusColor {
        self.selected
    }

    pub fn slider_value(&self) -> u8 {
        self.slider_value
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    pub fn confirmation_visible(&self) -> bool {
        self.confirmation.is_some()
    }

    /// "Tap badge to update" is shown for unsynced changes.
    pub fn prompt_visible(&self) -> bool {
        self.has_changed && !self.confirmation_visible()
    }

    pub fn select(&mut self, color: StatusColor) {
        self.selected = color;
        self.slider_value = color.slider_position();
        self.has_changed = true;
    }

    /// The slider keeps its raw value for the preview but selects the color of its zone.
    pub fn set_slider(&mut self, value: u8) {
        let value = value.min(100);
        self.selected = StatusColor::from_slider(value);
        self.slider_value = value;
        self.has_changed = true;
    }

    /// Returns the color to write, or None when there is nothing to sync or a sync is running.
    pub fn begin_sync(&mut self) -> Option<StatusColor> {
        if !self.has_changed || self.syncing {
            return None;
        }

        self.syncing = true;
        Some(self.selected)
    }

    /// Shows the confirmation for a sync started during `visit`; dismiss it with the returned
    /// token after `CONFIRMATION_DURATION`. None if that sync belongs to an earlier visit.
    pub fn finish_sync(&mut self, visit: u64) -> Option<u64> {
        if visit != self.visit || !self.syncing {
            debug!("Ignoring sync result of visit {}", visit);
            return None;
        }

        self.syncing = false;
        self.has_changed = false;
        self.confirmation_counter += 1;
        self.confirmation = Some(self.confirmation_counter);
        Some(self.confirmation_counter)
    }

    pub fn dismiss_confirmation(&mut self, token: u64) {
        if self.confirmation == Some(token) {
            self.confirmation = None;
        }
    }

    pub fn confirmation_duration() -> Duration {
        Duration::from_millis(CONFIRMATION_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_green_without_prompt() {
        let control = BadgeControl::default();
        assert_eq!(control.selected(), StatusColor::Green);
        assert_eq!(control.slider_value(), 0);
        assert!(!control.prompt_visible());
    }

    #[test]
    fn sync_requires_a_change() {
        let mut control = BadgeControl::default();
        assert_eq!(control.begin_sync(), None);

        control.select(StatusColor::Red);
        assert!(control.prompt_visible());
        assert_eq!(control.begin_sync(), Some(StatusColor::Red));
    }

    #[test]
    fn no_second_sync_while_syncing() {
        let mut control = BadgeControl::default();
        control.select(StatusColor::Yellow);

        assert_eq!(control.begin_sync(), Some(StatusColor::Yellow));
        assert_eq!(control.begin_sync(), None);
        assert!(control.is_syncing());
    }

    #[test]
    fn finish_shows_confirmation_until_dismissed() {
        let mut control = BadgeControl::default();
        control.select(StatusColor::Red);
        control.begin_sync();

        let token = control.finish_sync(control.visit()).unwrap();
        assert!(control.confirmation_visible());
        assert!(!control.prompt_visible());
        assert!(!control.is_syncing());

        control.dismiss_confirmation(token);
        assert!(!control.confirmation_visible());
        assert!(!control.prompt_visible());
    }

    #[test]
    fn stale_dismissal_keeps_newer_confirmation() {
        let mut control = BadgeControl::default();

        control.select(StatusColor::Red);
        control.begin_sync();
        let first = control.finish_sync(control.visit()).unwrap();

        control.select(StatusColor::Yellow);
        control.begin_sync();
        let second = control.finish_sync(control.visit()).unwrap();

        control.dismiss_confirmation(first);
        assert!(control.confirmation_visible());

        control.dismiss_confirmation(second);
        assert!(!control.confirmation_visible());
    }

    #[test]
    fn slider_selects_zone_and_keeps_raw_value() {
        let mut control = BadgeControl::default();
        control.set_slider(60);

        assert_eq!(control.selected(), StatusColor::Yellow);
        assert_eq!(control.slider_value(), 60);
        assert!(control.prompt_visible());
    }

    #[test]
    fn sync_result_of_previous_visit_is_ignored() {
        let mut control = BadgeControl::default();
        control.select(StatusColor::Red);
        control.begin_sync();
        let old_visit = control.visit();

        control.reset();
        assert_eq!(control.finish_sync(old_visit), None);
        assert!(!control.confirmation_visible());

        // even when the new visit has a sync of its own running
        control.select(StatusColor::Yellow);
        control.begin_sync();
        assert_eq!(control.finish_sync(old_visit), None);
        assert!(control.is_syncing());
    }

    #[test]
    fn dismissal_from_previous_visit_keeps_new_confirmation() {
        let mut control = BadgeControl::default();
        control.select(StatusColor::Red);
        control.begin_sync();
        let old_token = control.finish_sync(control.visit()).unwrap();

        control.reset();
        assert!(!control.confirmation_visible());
        assert_eq!(control.selected(), StatusColor::Green);

        control.select(StatusColor::Yellow);
        control.begin_sync();
        let new_token = control.finish_sync(control.visit()).unwrap();
        assert_ne!(new_token, old_token);

        control.dismiss_confirmation(old_token);
        assert!(control.confirmation_visible());
    }

    #[test]
    fn finish_without_sync_is_ignored() {
        let mut control = BadgeControl::default();
        assert_eq!(control.finish_sync(control.visit()), None);
        assert!(!control.confirmation_visible());
    }
}
