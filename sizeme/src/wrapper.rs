use alloc::rc::Rc;
use alloc::string::String;

use crate::instance::Instance;
use crate::{Clock, ConfigurationError, Placeholder, Size, SizeMeConfig, SizeMeOptions, Style};

/// A presentational unit that renders from its props and an injected [`Size`].
///
/// Implemented for any `Fn(&P, Size) -> O`.
pub trait Component<P> {
    type Output;

    fn render(&self, props: &P, size: Size) -> Self::Output;
}

impl<P, O, F> Component<P> for F
where
    F: Fn(&P, Size) -> O,
{
    type Output = O;

    fn render(&self, props: &P, size: Size) -> O {
        self(props, size)
    }
}

/// Props accepted by a size-aware component: the wrapped component's own props plus the
/// placeholder pass-through attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SizeMeProps<P> {
    pub props: P,
    /// Forwarded onto the placeholder only.
    pub class_name: Option<String>,
    /// Forwarded onto the placeholder only.
    pub style: Option<Style>,
}

impl<P> SizeMeProps<P> {
    pub fn new(props: P) -> Self {
        Self {
            props,
            class_name: None,
            style: None,
        }
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

impl<P> From<P> for SizeMeProps<P> {
    fn from(props: P) -> Self {
        Self::new(props)
    }
}

/// Output of a size-aware render pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered<O> {
    /// The instance is unmeasured; the host should mount the invisible proxy element.
    Placeholder(Placeholder),
    /// The wrapped component's output.
    Content(O),
}

impl<O> Rendered<O> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        match self {
            Self::Placeholder(p) => Some(p),
            Self::Content(_) => None,
        }
    }

    pub fn content(&self) -> Option<&O> {
        match self {
            Self::Placeholder(_) => None,
            Self::Content(o) => Some(o),
        }
    }

    pub fn into_content(self) -> Option<O> {
        match self {
            Self::Placeholder(_) => None,
            Self::Content(o) => Some(o),
        }
    }
}

/// A size-aware wrapper factory.
///
/// Holds a validated configuration; every component wrapped by it shares that configuration.
#[derive(Clone)]
pub struct SizeMe {
    config: SizeMeConfig,
    clock: Rc<dyn Clock>,
}

impl SizeMe {
    /// Validates `options` and creates a factory driven by the system clock.
    #[cfg(feature = "std")]
    pub fn new(options: SizeMeOptions) -> Result<Self, ConfigurationError> {
        Self::with_clock(options, crate::SystemClock::new())
    }

    /// Validates `options` and creates a factory driven by `clock`.
    pub fn with_clock(
        options: SizeMeOptions,
        clock: impl Clock + 'static,
    ) -> Result<Self, ConfigurationError> {
        let config = options.validate()?;
        sdebug!(
            monitor_width = config.monitor_width(),
            monitor_height = config.monitor_height(),
            refresh_rate_ms = config.refresh_rate_ms(),
            no_placeholder = config.no_placeholder(),
            "SizeMe::new"
        );
        Ok(Self {
            config,
            clock: Rc::new(clock),
        })
    }

    pub fn config(&self) -> &SizeMeConfig {
        &self.config
    }

    /// Wraps a component, producing its size-aware counterpart.
    pub fn wrap<C>(&self, component: C) -> SizeAware<C> {
        SizeAware {
            component: Rc::new(component),
            config: self.config.clone(),
            clock: Rc::clone(&self.clock),
        }
    }
}

impl core::fmt::Debug for SizeMe {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SizeMe")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Shorthand for [`SizeMe::new`].
#[cfg(feature = "std")]
pub fn size_me(options: SizeMeOptions) -> Result<SizeMe, ConfigurationError> {
    SizeMe::new(options)
}

/// A wrapped component. Each [`SizeAware::instantiate`] call creates an independent instance.
pub struct SizeAware<C> {
    component: Rc<C>,
    config: SizeMeConfig,
    clock: Rc<dyn Clock>,
}

impl<C> Clone for SizeAware<C> {
    fn clone(&self) -> Self {
        Self {
            component: Rc::clone(&self.component),
            config: self.config.clone(),
            clock: Rc::clone(&self.clock),
        }
    }
}

impl<C> SizeAware<C> {
    pub fn config(&self) -> &SizeMeConfig {
        &self.config
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    /// Creates an unmounted, unmeasured instance.
    ///
    /// Render it, attach the output to the live tree, then call [`Instance::did_mount`] with the
    /// rendered root element.
    pub fn instantiate<P, E>(&self, props: SizeMeProps<P>) -> Instance<C, P, E>
    where
        C: Component<P>,
    {
        Instance::new(
            Rc::clone(&self.component),
            self.config.clone(),
            Rc::clone(&self.clock),
            props,
        )
    }
}

impl<C> core::fmt::Debug for SizeAware<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SizeAware")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
