//! Adapter utilities for the `sizeme` crate.
//!
//! The `sizeme` crate is UI-agnostic and only defines the collaborator traits a host must supply.
//! This crate provides small, framework-neutral implementations of them:
//!
//! - An element handle with a host-controlled layout box ([`Element`])
//! - A shared, asynchronous element resize detector registry ([`ElementResizeDetector`])
//! - A driver that mounts, ticks, re-renders and unmounts a wrapped component ([`Host`])
//!
//! This crate is intentionally framework-agnostic (no DOM/egui/ratatui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod detector;
mod element;
mod error;
mod host;
mod state;


pub use detector::ElementResizeDetector;
pub use element::Element;
pub use error::DetectorError;
pub use host::Host;
pub use state::DetectorStats;
