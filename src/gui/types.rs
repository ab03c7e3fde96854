use iced::Event;

use crate::badge::types::StatusColor;
use crate::config::types::{Preferences, ThemePreference};
use crate::device::types::{ConnectionStatus, WriteOutcome};

#[derive(Debug, Clone)]
pub enum Message {
    EventOccurred(Event),
    PreferencesLoadComplete((Preferences, Option<String>)),
    PreferencesSaveComplete(Option<String>), // error message if saving failed
    NoticeConfirmed,
    ToggleTheme,
    SystemThemePoll,
    SystemThemeDetected(ThemePreference),

    // screen flow
    SplashComplete,
    GuideDelayElapsed(u64),
    GuideDismissed,
    ExitAnimationComplete(u64),
    ExitControl,

    // nfc
    StatusChanged(ConnectionStatus),
    TapPressed,
    ControllerCallComplete(()),

    // control screen
    ColorSelected(StatusColor),
    SliderChanged(u8),
    SyncPressed,
    SyncComplete((u64, WriteOutcome)), // control screen visit that started the sync
    ConfirmationElapsed(u64),
}
