use std::env;
use std::time::Duration;

use cogtest_core::session::AdvancePolicy;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_MIXED_TOTAL: u32 = 16;
pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 1280,
    height: 900,
};

/// Where the scoring backend lives and how long a request may take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Build a config for the given base URL with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ConfigError::InvalidBaseUrl(base_url.to_owned()))?;
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Read `COGTEST_API_URL` and `COGTEST_API_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("COGTEST_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let mut config = Self::new(&base_url)?;
        if let Ok(raw) = env::var("COGTEST_API_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout(raw));
            }
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Parse `immediate` / `manual` (case-insensitive) into an advance policy.
///
/// # Errors
///
/// Returns `ConfigError::InvalidPolicy` for anything else.
pub fn parse_policy(raw: &str) -> Result<AdvancePolicy, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "immediate" => Ok(AdvancePolicy::Immediate),
        "manual" | "manual_gate" | "manual-gate" => Ok(AdvancePolicy::ManualGate),
        _ => Err(ConfigError::InvalidPolicy(raw.to_owned())),
    }
}

/// Window size the pages are laid out for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// One response colour of the Stroop batteries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteColor {
    pub name: String,
    pub hex: String,
}

/// Ordered response colours with their display values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StroopPalette {
    colors: Vec<PaletteColor>,
}

impl StroopPalette {
    #[must_use]
    pub fn new(colors: Vec<PaletteColor>) -> Self {
        Self { colors }
    }

    #[must_use]
    pub fn colors(&self) -> &[PaletteColor] {
        &self.colors
    }

    /// Display colour for an ink name; unknown names pass through unchanged.
    #[must_use]
    pub fn ink(&self, name: &str) -> String {
        self.colors
            .iter()
            .find(|color| color.name == name)
            .map_or_else(|| name.to_owned(), |color| color.hex.clone())
    }
}

impl Default for StroopPalette {
    fn default() -> Self {
        let colors = [
            ("rojo", "#ef4444"),
            ("verde", "#22c55e"),
            ("azul", "#3b82f6"),
            ("amarillo", "#eab308"),
        ]
        .into_iter()
        .map(|(name, hex)| PaletteColor {
            name: name.to_owned(),
            hex: hex.to_owned(),
        })
        .collect();
        Self { colors }
    }
}

/// Settings shared by the run loops, passed in explicitly at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct RunLoopConfig {
    pub policy: AdvancePolicy,
    pub viewport: Viewport,
    pub feedback_delay: Duration,
    pub palette: StroopPalette,
    pub mixed_default_total: u32,
}

impl Default for RunLoopConfig {
    fn default() -> Self {
        Self {
            policy: AdvancePolicy::Immediate,
            viewport: DEFAULT_VIEWPORT,
            feedback_delay: DEFAULT_FEEDBACK_DELAY,
            palette: StroopPalette::default(),
            mixed_default_total: DEFAULT_MIXED_TOTAL,
        }
    }
}

impl RunLoopConfig {
    #[must_use]
    pub fn with_policy(mut self, policy: AdvancePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport { width, height };
        self
    }
}
