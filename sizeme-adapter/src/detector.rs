use alloc::collections::{BTreeMap, VecDeque};
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use sizeme::{Listener, ResizeDetector};

use crate::{DetectorError, DetectorStats, Element};

#[derive(Default)]
struct Registry {
    listeners: BTreeMap<u64, Vec<Listener<Element>>>,
    queue: VecDeque<Element>,
    listens: usize,
    removals: usize,
}

/// An in-process element resize detector.
///
/// Clones share one registry, so every mounted instance in a host talks to the same detector;
/// registrations are keyed by element and never interfere across elements.
///
/// Delivery is always asynchronous: `listen_to` and `notify` only enqueue, and listeners run in
/// [`ElementResizeDetector::flush`]. Like most platform detectors, a freshly installed listener
/// receives one initial notification so the element gets measured without a layout change.
#[derive(Clone, Default)]
pub struct ElementResizeDetector {
    registry: Rc<RefCell<Registry>>,
}

impl ElementResizeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports that `element`'s box may have changed.
    pub fn notify(&self, element: &Element) {
        let mut reg = self.registry.borrow_mut();
        if reg.listeners.contains_key(&element.id()) {
            reg.queue.push_back(element.clone());
        }
    }

    /// Delivers every queued notification. Returns the number of listener invocations.
    ///
    /// Listeners removed before delivery are skipped, as are detached elements. Notifications
    /// enqueued by listeners themselves are delivered in the same flush.
    pub fn flush(&self) -> usize {
        let mut delivered = 0usize;
        loop {
            let next = self.registry.borrow_mut().queue.pop_front();
            let Some(element) = next else {
                break;
            };
            if !element.is_attached() {
                atrace!(id = element.id(), "flush: skipping detached element");
                continue;
            }
            let listeners = self
                .registry
                .borrow()
                .listeners
                .get(&element.id())
                .cloned()
                .unwrap_or_default();
            for listener in listeners {
                listener(&element);
                delivered += 1;
            }
        }
        if delivered > 0 {
            atrace!(delivered, "ElementResizeDetector::flush");
        }
        delivered
    }

    pub fn listen_count(&self) -> usize {
        self.registry.borrow().listens
    }

    pub fn remove_count(&self) -> usize {
        self.registry.borrow().removals
    }

    /// Listeners currently registered for `element`.
    pub fn listener_count(&self, element: &Element) -> usize {
        self.registry
            .borrow()
            .listeners
            .get(&element.id())
            .map_or(0, Vec::len)
    }

    pub fn stats(&self) -> DetectorStats {
        let reg = self.registry.borrow();
        DetectorStats {
            listens: reg.listens,
            removals: reg.removals,
            listeners: reg.listeners.values().map(Vec::len).sum(),
            queued: reg.queue.len(),
        }
    }
}

impl ResizeDetector<Element> for ElementResizeDetector {
    type Error = DetectorError;

    fn listen_to(
        &mut self,
        element: &Element,
        listener: Listener<Element>,
    ) -> Result<(), DetectorError> {
        if !element.is_attached() {
            return Err(DetectorError::Detached { id: element.id() });
        }
        let mut reg = self.registry.borrow_mut();
        reg.listens += 1;
        reg.listeners
            .entry(element.id())
            .or_default()
            .push(listener);
        reg.queue.push_back(element.clone());
        adebug!(id = element.id(), "listen_to");
        Ok(())
    }

    fn remove_all_listeners(&mut self, element: &Element) -> Result<(), DetectorError> {
        let mut reg = self.registry.borrow_mut();
        reg.removals += 1;
        reg.listeners.remove(&element.id());
        adebug!(id = element.id(), "remove_all_listeners");
        Ok(())
    }
}

impl core::fmt::Debug for ElementResizeDetector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ElementResizeDetector")
            .field("stats", &self.stats())
            .finish()
    }
}
