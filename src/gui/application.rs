use std::sync::Arc;
use iced::{Alignment, Application, Command, Element, Length, Settings, Size, Subscription, window};
use iced::event::{self, Event};
use iced::theme::{self, Theme};
use iced::time::{every as iced_time_every};
use iced::widget::{Column, Row, Space, button, column, container, row, slider, text};
use log::{debug, error, info, warn};
use tokio::task::spawn_blocking;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

use crate::badge::color::{interpolate, status_hsl};
use crate::badge::control::BadgeControl;
use crate::badge::types::StatusColor;
use crate::config::io::PreferencesIO;
use crate::config::types::{Preferences, SessionFlags, ThemePreference};
use crate::device::controller::NfcController;
use crate::device::haptics::{Haptics, NoHaptics};
use crate::device::host::NfcHost;
use crate::device::subscription::status_subscription;
use crate::device::types::{ConnectionStatus, WriteOutcome};
use crate::error::AppRunError;
use crate::gui::flow::{ScreenFlow, TapAction};
use crate::gui::screens::{Effect, Screen, ScreenTiming};
use crate::gui::style::{hsl_color, BadgeStyleSheet, ColorDotStyleSheet, TextButtonStyleSheet};
use crate::gui::types::Message;

/**
 * How often (seconds) the desktop light/dark setting is checked while no theme is stored.
 */
const SYSTEM_THEME_POLL: u64 = 5;

const GUIDE_STEPS: [(&str, &str); 2] = [
    ("Pick a color", "Tap green (Open), yellow (Selective), or red (Do Not Disturb) to set your status."),
    ("Tap your badge", "When you see \u{201c}Tap badge to update\u{201d}, hold the badge to the reader to sync the new color."),
];

pub struct ApplicationFlags {
    pub preferences_io: PreferencesIO,
    pub host: Arc<dyn NfcHost>,
    pub haptics: Arc<dyn Haptics>,
}

pub struct SocialBatteryApp {
    // this token is cancelled upon exit
    app_cancel: CancellationToken,

    // messages that the user must click away
    notices: Vec<String>,

    preferences_io: PreferencesIO,
    preferences: Preferences,
    // this flag is used to make sure that a user is not spammed with save errors
    displayed_save_error: bool,
    // used until the user picks a theme
    system_theme: ThemePreference,

    flow: ScreenFlow,
    badge: BadgeControl,
}

impl SocialBatteryApp {
    fn before_close(&mut self) {
        self.app_cancel.cancel();
    }

    fn load_preferences(&self) -> Command<Message> {
        let preferences_io = self.preferences_io.clone();

        let fut = async move {
            match preferences_io.read().await {
                Ok(preferences) => (preferences, None),
                Err(err) => {
                    error!("Failed to load preferences: {:?}", &err);
                    (Preferences::default(), Some(format!("Failed to load preferences: {}", &err)))
                },
            }
        };

        Command::perform(fut, Message::PreferencesLoadComplete)
    }

    fn save_preferences(&self) -> Command<Message> {
        let preferences = self.preferences.clone();
        let preferences_io = self.preferences_io.clone();

        let fut = async move {
            match preferences_io.save(preferences).await {
                Ok(_) => None,
                Err(err) => {
                    error!("Failed to save preferences: {:?}", &err);
                    Some(format!("Failed to save preferences: {}", &err))
                },
            }
        };

        Command::perform(fut, Message::PreferencesSaveComplete)
    }

    fn current_theme(&self) -> ThemePreference {
        self.preferences.theme_or(self.system_theme)
    }

    fn detect_system_theme() -> Command<Message> {
        let fut = async {
            match spawn_blocking(ThemePreference::system).await {
                Ok(theme) => theme,
                Err(err) => {
                    warn!("Detecting the system theme failed: {}", err);
                    ThemePreference::default()
                },
            }
        };

        Command::perform(fut, Message::SystemThemeDetected)
    }

    fn after(duration: Duration, message: Message) -> Command<Message> {
        Command::perform(sleep(duration), move |_| message)
    }

    fn run_effects(&self, effects: Vec<Effect>) -> Command<Message> {
        let commands = effects.into_iter().map(|effect| match effect {
            Effect::ScheduleSplash(after) => Self::after(after, Message::SplashComplete),
            Effect::ScheduleGuide { after, visit } => Self::after(after, Message::GuideDelayElapsed(visit)),
            Effect::ScheduleExit { after, visit } => Self::after(after, Message::ExitAnimationComplete(visit)),
            Effect::StartScan => {
                let controller = self.flow.controller().clone();
                Command::perform(async move { controller.start_scan().await }, Message::ControllerCallComplete)
            },
            // already applied by ScreenFlow
            Effect::ResetConnection => Command::none(),
        });

        Command::batch(commands.collect::<Vec<_>>())
    }

    fn tap(&self) -> Command<Message> {
        let controller = self.flow.controller().clone();

        match self.flow.tap() {
            TapAction::Simulate => {
                Command::perform(async move { controller.simulate_tap() }, Message::ControllerCallComplete)
            },
            TapAction::Scan => {
                Command::perform(async move { controller.start_scan().await }, Message::ControllerCallComplete)
            },
            TapAction::Ignore => Command::none(),
        }
    }

    fn sync_badge(&mut self) -> Command<Message> {
        match self.badge.begin_sync() {
            None => Command::none(),
            Some(color) => {
                let controller = self.flow.controller().clone();
                let visit = self.badge.visit();
                Command::perform(
                    async move { (visit, controller.write_color(color).await) },
                    Message::SyncComplete,
                )
            },
        }
    }

    fn theme_toggle(&self) -> Element<Message> {
        let label = match self.current_theme() {
            ThemePreference::Dark => "Light mode",
            ThemePreference::Light => "Dark mode",
        };

        button(text(label).size(14))
            .style(theme::Button::Custom(Box::new(TextButtonStyleSheet)))
            .on_press(Message::ToggleTheme)
            .into()
    }

    fn view_splash(&self) -> Element<Message> {
        column![
            text("Social Battery").size(36),
            text("Your availability, on your badge").size(16),
        ]
        .align_items(Alignment::Center)
        .spacing(10)
        .into()
    }

    fn view_guide(&self) -> Element<Message> {
        let steps = Column::with_children(
            GUIDE_STEPS
                .iter()
                .enumerate()
                .map(|(index, (title, description))| {
                    column![
                        text(format!("{}. {}", index + 1, title)).size(18),
                        text(*description).size(14),
                    ]
                    .spacing(4)
                })
                .map(Element::from)
        )
        .spacing(16);

        column![
            text("Quick start").size(12),
            text("How to use").size(26),
            text("Two steps to set your social battery").size(14),
            steps,
            button(text("Continue")).on_press(Message::GuideDismissed),
        ]
        .align_items(Alignment::Center)
        .spacing(20)
        .max_width(340.0)
        .into()
    }

    fn view_nfc(&self) -> Element<Message> {
        if self.flow.screens().guide_visible() {
            return self.view_guide();
        }

        let mut tap_button = button(text("NFC").size(28)).padding(30);
        if !self.flow.screens().is_exiting() {
            tap_button = tap_button.on_press(Message::TapPressed);
        }

        let hint = if self.flow.controller().is_supported() {
            "Hold your badge near the reader"
        } else {
            "Tap the icon above to connect"
        };

        let status = match self.flow.latest_status() {
            ConnectionStatus::Idle => "",
            ConnectionStatus::Scanning => "Scanning\u{2026}",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Error => "Could not read the badge. Tap to try again.",
        };

        column![
            tap_button,
            text("Tap your badge").size(22),
            text(hint).size(14),
            text(status).size(14),
        ]
        .align_items(Alignment::Center)
        .spacing(16)
        .into()
    }

    fn view_control(&self) -> Element<Message> {
        let selected = self.badge.selected();
        let preview = container(text(selected.label()).size(16))
            .width(Length::Fixed(160.0))
            .height(Length::Fixed(160.0))
            .center_x()
            .center_y()
            .style(theme::Container::Custom(Box::new(BadgeStyleSheet {
                color: hsl_color(interpolate(f32::from(self.badge.slider_value()))),
            })));

        let color_buttons = StatusColor::all().into_iter().map(|color| {
            button(Space::new(Length::Fixed(48.0), Length::Fixed(48.0)))
                .style(theme::Button::Custom(Box::new(ColorDotStyleSheet {
                    color: hsl_color(status_hsl(color)),
                    selected: color == selected,
                })))
                .on_press(Message::ColorSelected(color))
        });

        let footer: Element<Message> = if self.badge.confirmation_visible() {
            text("\u{2713} Badge updated").size(14).into()
        } else if self.badge.prompt_visible() {
            let mut prompt = button(text("Tap badge to update").size(14));
            if !self.badge.is_syncing() {
                prompt = prompt.on_press(Message::SyncPressed);
            }
            prompt.into()
        } else {
            Space::with_height(Length::Fixed(30.0)).into()
        };

        column![
            preview,
            text(selected.label()).size(20),
            Row::with_children(color_buttons.map(Element::from)).spacing(16),
            slider(0..=100, self.badge.slider_value(), Message::SliderChanged).width(Length::Fixed(260.0)),
            footer,
            button(text("Pair another badge").size(14))
                .style(theme::Button::Custom(Box::new(TextButtonStyleSheet)))
                .on_press(Message::ExitControl),
        ]
        .align_items(Alignment::Center)
        .spacing(24)
        .into()
    }
}

impl Application for SocialBatteryApp {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ApplicationFlags;

    fn new(flags: ApplicationFlags) -> (SocialBatteryApp, Command<Self::Message>) {
        let app_cancel = CancellationToken::new();
        let controller = NfcController::new(flags.host, flags.haptics, app_cancel.clone());
        let flow = ScreenFlow::new(controller, SessionFlags::default(), ScreenTiming::default());

        let app = SocialBatteryApp {
            app_cancel,
            notices: Vec::new(),
            preferences_io: flags.preferences_io,
            preferences: Preferences::default(),
            displayed_save_error: false,
            system_theme: ThemePreference::default(),
            flow,
            badge: BadgeControl::default(),
        };

        let command = Command::batch(vec![
            app.load_preferences(),
            Self::detect_system_theme(),
            app.run_effects(app.flow.start()),
        ]);
        (app, command)
    }

    fn title(&self) -> String {
        String::from(concat!("Social Battery ", env!("CARGO_PKG_VERSION")))
    }

    fn theme(&self) -> Theme {
        match self.current_theme() {
            ThemePreference::Light => Theme::Light,
            ThemePreference::Dark => Theme::Dark,
        }
    }

    fn update(&mut self, message: Message) -> Command<Self::Message> {
        match message {
            Message::PreferencesLoadComplete((preferences, error_message)) => {
                info!("Preferences load complete, theme {:?}", preferences.theme);
                self.preferences = preferences;
                if let Some(error_message) = error_message {
                    self.notices.push(error_message);
                }
            },
            Message::PreferencesSaveComplete(error_message) => {
                if !self.displayed_save_error {
                    if let Some(error_message) = error_message {
                        self.displayed_save_error = true;
                        self.notices.push(error_message);
                    }
                }
            },
            Message::NoticeConfirmed => {
                if !self.notices.is_empty() {
                    self.notices.remove(0);
                }
            },
            Message::ToggleTheme => {
                self.preferences.theme = Some(self.current_theme().toggled());
                return self.save_preferences();
            },
            Message::SystemThemePoll => {
                return Self::detect_system_theme();
            },
            Message::SystemThemeDetected(theme) => {
                if theme != self.system_theme {
                    info!("System theme {}", theme);
                    self.system_theme = theme;
                }
            },
            Message::EventOccurred(Event::Window(id, window::Event::CloseRequested)) => {
                info!("Close requested");
                self.before_close();
                return window::close(id);
            },

            Message::SplashComplete => {
                let effects = self.flow.splash_complete();
                return self.run_effects(effects);
            },
            Message::GuideDelayElapsed(visit) => {
                self.flow.guide_delay_elapsed(visit);
            },
            Message::GuideDismissed => {
                self.flow.dismiss_guide();
            },
            Message::ExitAnimationComplete(visit) => {
                self.flow.exit_complete(visit);
            },
            Message::ExitControl => {
                let effects = self.flow.user_exit();
                self.badge.reset();
                return self.run_effects(effects);
            },

            Message::StatusChanged(_) => {
                let effects = self.flow.status_changed();
                return self.run_effects(effects);
            },
            Message::TapPressed => {
                return self.tap();
            },
            Message::ControllerCallComplete(()) => {},

            Message::ColorSelected(color) => {
                self.badge.select(color);
            },
            Message::SliderChanged(value) => {
                self.badge.set_slider(value);
            },
            Message::SyncPressed => {
                return self.sync_badge();
            },
            Message::SyncComplete((visit, outcome)) => {
                if let WriteOutcome::Failed(reason) = &outcome {
                    debug!("Badge write failed ({}), confirming anyway", reason);
                }
                if self.flow.screen() != Screen::Control {
                    return Command::none();
                }
                if let Some(token) = self.badge.finish_sync(visit) {
                    return Self::after(BadgeControl::confirmation_duration(), Message::ConfirmationElapsed(token));
                }
            },
            Message::ConfirmationElapsed(token) => {
                if self.flow.screen() == Screen::Control {
                    self.badge.dismiss_confirmation(token);
                }
            },

            _ => {}
        }

        Command::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![
            event::listen().map(Message::EventOccurred),
            status_subscription(self.flow.controller().clone()).map(Message::StatusChanged),
        ];

        if self.preferences.theme.is_none() {
            subscriptions.push(
                iced_time_every(Duration::from_secs(SYSTEM_THEME_POLL)).map(|_| Message::SystemThemePoll),
            );
        }

        Subscription::batch(subscriptions)
    }

    fn view(&self) -> Element<Message> {
        if let Some(notice) = self.notices.first() {
            return container(
                column![
                    text(notice),

                    button(text("Okay"))
                        .on_press(Message::NoticeConfirmed),

                ].align_items(Alignment::Center).spacing(20),
            )
            .width(Length::Fill)
            .padding(20)
            .into()
        }

        let content = match self.flow.screen() {
            Screen::Splash => self.view_splash(),
            Screen::Nfc => self.view_nfc(),
            Screen::Control => self.view_control(),
        };

        let header: Element<Message> = match self.flow.screen() {
            Screen::Splash => Space::with_height(Length::Fixed(30.0)).into(),
            _ => self.theme_toggle(),
        };

        column![
            row![Space::with_width(Length::Fill), header],
            container(content)
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x()
                .center_y(),
        ]
        .padding(20)
        .into()
    }
}

pub fn run_application(host: Arc<dyn NfcHost>) -> Result<(), AppRunError> {
    let mut preferences_io = PreferencesIO::new_sync()?;
    let mut preferences_locker = preferences_io.locker()?;
    let _lock_guard = preferences_locker.lock()?;

    let flags = ApplicationFlags {
        preferences_io,
        host,
        haptics: Arc::new(NoHaptics),
    };
    let mut settings = Settings::with_flags(flags);

    // handle exits ourselves (Event::CloseRequested)
    settings.id = Some("social-battery".to_string());
    settings.window.exit_on_close_request = false;
    settings.window.size = Size::new(420.0, 760.0);
    settings.window.resizable = false;

    // this function will call process::exit() unless there was a startup error
    SocialBatteryApp::run(settings)?;
    Ok(())
}
