use crate::{BoxSize, Size};

/// Measurement phase of a mounted instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// No size has been committed yet; the placeholder is rendered.
    #[default]
    Unmeasured,
    /// A size has been committed. Terminal until unmount.
    Measured,
}

/// Per-instance size bookkeeping.
///
/// Only monitored axes are ever extracted, stored or compared; a disabled axis stays `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeState {
    monitor_width: bool,
    monitor_height: bool,
    size: Size,
    phase: Phase,
}

impl SizeState {
    pub fn new(monitor_width: bool, monitor_height: bool) -> Self {
        Self {
            monitor_width,
            monitor_height,
            size: Size::UNMEASURED,
            phase: Phase::Unmeasured,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_been_measured(&self) -> bool {
        self.phase == Phase::Measured
    }

    /// Keeps only the monitored axes of a raw box.
    pub fn extract(&self, raw: BoxSize) -> Size {
        Size {
            width: self.monitor_width.then_some(raw.width),
            height: self.monitor_height.then_some(raw.height),
        }
    }

    /// Whether `a` and `b` differ on any monitored axis.
    pub fn differs(&self, a: Size, b: Size) -> bool {
        (self.monitor_width && a.width != b.width) || (self.monitor_height && a.height != b.height)
    }

    /// Applies a size. Returns whether the instance needs a re-render.
    ///
    /// The first commit always transitions to [`Phase::Measured`], even if the monitored axes
    /// report `0`.
    pub fn commit(&mut self, size: Size) -> bool {
        if self.phase == Phase::Measured && !self.differs(size, self.size) {
            return false;
        }
        self.size = size;
        self.phase = Phase::Measured;
        true
    }
}
