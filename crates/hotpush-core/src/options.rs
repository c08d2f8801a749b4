/// When staged content becomes the running content.
///
/// Wire values match what the native install hook expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// Reload onto the new content as soon as the install hook is invoked.
    Immediate,
    /// Apply on the next full application restart.
    OnNextRestart,
    /// Apply the next time the application returns from the background.
    OnNextResume,
}

impl InstallMode {
    pub fn wire_value(self) -> u8 {
        match self {
            Self::Immediate => 0,
            Self::OnNextRestart => 1,
            Self::OnNextResume => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::OnNextRestart => "on-next-restart",
            Self::OnNextResume => "on-next-resume",
        }
    }
}

/// Resolved install configuration. Construct one at startup and pass it into
/// the orchestrator; there is no process-wide mutable default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    pub install_mode: InstallMode,
    pub mandatory_install_mode: InstallMode,
    pub minimum_background_duration: u32,
}

impl InstallOptions {
    pub const DEFAULT: Self = Self {
        install_mode: InstallMode::OnNextRestart,
        mandatory_install_mode: InstallMode::Immediate,
        minimum_background_duration: 0,
    };

    /// The mode that actually applies to a package, honoring the mandatory
    /// variant when the package is marked mandatory.
    pub fn effective_mode(&self, is_mandatory: bool) -> InstallMode {
        if is_mandatory {
            self.mandatory_install_mode
        } else {
            self.install_mode
        }
    }
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Caller-supplied partial options. Unset fields inherit from the defaults
/// they are resolved against, field by field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOverrides {
    pub install_mode: Option<InstallMode>,
    pub mandatory_install_mode: Option<InstallMode>,
    pub minimum_background_duration: Option<u32>,
}

impl InstallOverrides {
    pub fn resolve(self, defaults: InstallOptions) -> InstallOptions {
        InstallOptions {
            install_mode: self.install_mode.unwrap_or(defaults.install_mode),
            mandatory_install_mode: self
                .mandatory_install_mode
                .unwrap_or(defaults.mandatory_install_mode),
            minimum_background_duration: self
                .minimum_background_duration
                .unwrap_or(defaults.minimum_background_duration),
        }
    }
}
