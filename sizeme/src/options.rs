use alloc::sync::Arc;

use crate::{ConfigurationError, RefreshMode, Size};

/// Smallest accepted refresh window, roughly one frame at 60 Hz.
pub const MIN_REFRESH_RATE_MS: u64 = 16;

/// A callback fired with every committed size.
///
/// Shared like the other option callbacks (`Arc` + `Send + Sync`), so a validated config can be
/// built on one thread and handed to the UI thread that mounts instances.
pub type OnSizeCallback = Arc<dyn Fn(Size) + Send + Sync>;

/// Options supplied when creating a [`crate::SizeMe`] factory.
///
/// Start from `Default` and override fields with the `with_*` builders; unset fields keep their
/// documented defaults. Call [`SizeMeOptions::validate`] (or [`crate::SizeMe::new`]) to obtain
/// an immutable [`SizeMeConfig`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SizeMeOptions {
    /// Track the element width. Default `true`.
    pub monitor_width: bool,
    /// Track the element height. Default `true`.
    pub monitor_height: bool,
    /// Coalescing window in milliseconds. Must be at least [`MIN_REFRESH_RATE_MS`].
    pub refresh_rate_ms: u64,
    pub refresh_mode: RefreshMode,
    /// Render the wrapped component immediately (with an unmeasured size) instead of a
    /// placeholder. The wrapped component must cope with `None` dimensions.
    pub no_placeholder: bool,
    /// Optional callback fired after each committed size change.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub on_size: Option<OnSizeCallback>,
}

impl Default for SizeMeOptions {
    fn default() -> Self {
        Self {
            monitor_width: true,
            monitor_height: true,
            refresh_rate_ms: MIN_REFRESH_RATE_MS,
            refresh_mode: RefreshMode::Throttle,
            no_placeholder: false,
            on_size: None,
        }
    }
}

impl Clone for SizeMeOptions {
    fn clone(&self) -> Self {
        Self {
            monitor_width: self.monitor_width,
            monitor_height: self.monitor_height,
            refresh_rate_ms: self.refresh_rate_ms,
            refresh_mode: self.refresh_mode,
            no_placeholder: self.no_placeholder,
            on_size: self.on_size.clone(),
        }
    }
}

impl SizeMeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_monitor_width(mut self, monitor_width: bool) -> Self {
        self.monitor_width = monitor_width;
        self
    }

    pub fn with_monitor_height(mut self, monitor_height: bool) -> Self {
        self.monitor_height = monitor_height;
        self
    }

    pub fn with_refresh_rate_ms(mut self, refresh_rate_ms: u64) -> Self {
        self.refresh_rate_ms = refresh_rate_ms;
        self
    }

    pub fn with_refresh_mode(mut self, refresh_mode: RefreshMode) -> Self {
        self.refresh_mode = refresh_mode;
        self
    }

    pub fn with_no_placeholder(mut self, no_placeholder: bool) -> Self {
        self.no_placeholder = no_placeholder;
        self
    }

    pub fn with_on_size(mut self, on_size: Option<impl Fn(Size) + Send + Sync + 'static>) -> Self {
        self.on_size = on_size.map(|f| Arc::new(f) as _);
        self
    }

    /// Checks the invariants and freezes the options.
    pub fn validate(self) -> Result<SizeMeConfig, ConfigurationError> {
        if self.refresh_rate_ms < MIN_REFRESH_RATE_MS {
            swarn!(
                refresh_rate_ms = self.refresh_rate_ms,
                "SizeMeOptions::validate: refresh rate too low"
            );
            return Err(ConfigurationError::RefreshRateTooLow {
                refresh_rate_ms: self.refresh_rate_ms,
                min_ms: MIN_REFRESH_RATE_MS,
            });
        }
        if !self.monitor_width && !self.monitor_height {
            swarn!("SizeMeOptions::validate: no axis monitored");
            return Err(ConfigurationError::NoAxisMonitored);
        }
        Ok(SizeMeConfig(Arc::new(self)))
    }
}

impl core::fmt::Debug for SizeMeOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SizeMeOptions")
            .field("monitor_width", &self.monitor_width)
            .field("monitor_height", &self.monitor_height)
            .field("refresh_rate_ms", &self.refresh_rate_ms)
            .field("refresh_mode", &self.refresh_mode)
            .field("no_placeholder", &self.no_placeholder)
            .field("on_size", &self.on_size.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Validated, immutable configuration shared by a factory and every instance it creates.
#[derive(Clone, Debug)]
pub struct SizeMeConfig(Arc<SizeMeOptions>);

impl SizeMeConfig {
    pub fn monitor_width(&self) -> bool {
        self.0.monitor_width
    }

    pub fn monitor_height(&self) -> bool {
        self.0.monitor_height
    }

    pub fn refresh_rate_ms(&self) -> u64 {
        self.0.refresh_rate_ms
    }

    pub fn refresh_mode(&self) -> RefreshMode {
        self.0.refresh_mode
    }

    pub fn no_placeholder(&self) -> bool {
        self.0.no_placeholder
    }

    pub(crate) fn on_size(&self) -> Option<&OnSizeCallback> {
        self.0.on_size.as_ref()
    }

    pub fn options(&self) -> &SizeMeOptions {
        &self.0
    }
}
