//! A headless size-aware component wrapper.
//!
//! Wrapping a component with [`SizeMe::wrap`] gives it live knowledge of its rendered pixel
//! dimensions without the component doing any measurement itself:
//!
//! - an invisible, stretched [`Placeholder`] is rendered until a size is known,
//! - the host's [`ResizeDetector`] reports possible box changes for the rendered root,
//! - bursts of notifications are coalesced ([`RefreshMode::Throttle`] or
//!   [`RefreshMode::Debounce`]) into single commits,
//! - once measured, the wrapped component renders with the current [`Size`] injected.
//!
//! It is UI-agnostic. A UI layer is expected to provide:
//! - element handles that can report their layout box ([`Measure`])
//! - an element resize detection primitive ([`ResizeDetector`])
//! - a timer that calls [`Instance::poll`] at [`Instance::next_deadline_ms`]
//!
//! For an in-process detector registry and a host driver, see the `sizeme-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod clock;
mod detector;
mod error;
mod instance;
mod options;
mod placeholder;
mod scheduler;
mod state;
mod types;
mod wrapper;

#[cfg(test)]
mod tests;

#[cfg(feature = "std")]
pub use clock::SystemClock;
pub use clock::{Clock, ManualClock};
pub use detector::{Listener, Measure, ResizeDetector};
pub use error::ConfigurationError;
pub use instance::Instance;
pub use options::{MIN_REFRESH_RATE_MS, OnSizeCallback, SizeMeConfig, SizeMeOptions};
pub use placeholder::Placeholder;
pub use scheduler::{Debounce, RefreshMode, RefreshPolicy, Throttle, UpdateScheduler};
pub use state::{Phase, SizeState};
pub use types::{BoxSize, Size, Style};
#[cfg(feature = "std")]
pub use wrapper::size_me;
pub use wrapper::{Component, Rendered, SizeAware, SizeMe, SizeMeProps};
