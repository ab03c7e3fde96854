use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    #[default]
    Dark,
}

impl ThemePreference {
    /// The desktop's light/dark setting. Blocking, may query the desktop environment.
    pub fn system() -> ThemePreference {
        ThemePreference::from(dark_light::detect())
    }

    pub fn toggled(&self) -> ThemePreference {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }
}

impl From<dark_light::Mode> for ThemePreference {
    fn from(mode: dark_light::Mode) -> Self {
        match mode {
            dark_light::Mode::Light => ThemePreference::Light,
            dark_light::Mode::Dark => ThemePreference::Dark,
            // unknown desktop
            dark_light::Mode::Default => ThemePreference::default(),
        }
    }
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        };

        write!(f, "{}", result)
    }
}

/// Everything persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    // None until the user toggles the theme for the first time
    #[serde(rename = "social-battery-theme", default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemePreference>,
}

impl Preferences {
    /// The stored theme, or the system one until the user picks a theme.
    pub fn theme_or(&self, system: ThemePreference) -> ThemePreference {
        self.theme.unwrap_or(system)
    }
}

/// Flags that live as long as the process. Never written to disk, so a fresh start resets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionFlags {
    guide_seen: bool,
}

impl SessionFlags {
    pub fn guide_seen(&self) -> bool {
        self.guide_seen
    }

    pub fn mark_guide_seen(&mut self) {
        self.guide_seen = true;
    }
}
