use sizeme::{BoxSize, Component, Instance, Rendered, SizeAware, SizeMeProps};

use crate::{DetectorError, Element, ElementResizeDetector};

/// A framework-neutral driver for one mounted size-aware component.
///
/// The host models a parent slot with a layout box. Whatever the instance renders (placeholder or
/// content) becomes the slot's single root element and fills the slot. Adapters drive it by
/// calling:
/// - `resize_slot` when the parent layout changes
/// - `tick` each frame/timer tick (delivers detector notifications and commits due sizes)
/// - `set_props` when the caller's props change
pub struct Host<C, P>
where
    C: Component<P>,
{
    instance: Instance<C, P, Element>,
    detector: ElementResizeDetector,
    slot: BoxSize,
    root: Element,
    output: Rendered<C::Output>,
    renders: usize,
}

impl<C, P> Host<C, P>
where
    C: Component<P>,
{
    /// Renders, attaches the root to the slot and subscribes it with `detector`.
    pub fn mount(
        wrapped: &SizeAware<C>,
        props: SizeMeProps<P>,
        slot: BoxSize,
        detector: ElementResizeDetector,
    ) -> Result<Self, DetectorError> {
        let instance = wrapped.instantiate(props);
        let output = instance.render();
        let root = Element::new(slot);
        root.attach();
        let renders = usize::from(!output.is_placeholder());
        let mut host = Self {
            instance,
            detector,
            slot,
            root,
            output,
            renders,
        };
        adebug!(
            root = host.root.id(),
            placeholder = host.output.is_placeholder(),
            "Host::mount"
        );
        host.instance
            .did_mount(host.root.clone(), &mut host.detector)?;
        Ok(host)
    }

    pub fn instance(&self) -> &Instance<C, P, Element> {
        &self.instance
    }

    pub fn detector(&self) -> &ElementResizeDetector {
        &self.detector
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn slot(&self) -> BoxSize {
        self.slot
    }

    /// The output of the latest render.
    pub fn output(&self) -> &Rendered<C::Output> {
        &self.output
    }

    /// How many times the wrapped component has been rendered.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Changes the slot's layout box and reports the change to the detector.
    pub fn resize_slot(&mut self, slot: BoxSize) {
        self.slot = slot;
        self.root.set_rect(slot);
        self.detector.notify(&self.root);
    }

    /// Delivers pending notifications, then commits a due size. Returns whether it re-rendered.
    pub fn tick(&mut self) -> Result<bool, DetectorError> {
        self.detector.flush();
        if !self.instance.poll() {
            return Ok(false);
        }
        self.rerender()?;
        Ok(true)
    }

    /// Applies new caller props and re-renders with the current size.
    pub fn set_props(&mut self, props: SizeMeProps<P>) -> Result<(), DetectorError> {
        self.instance.set_props(props);
        self.rerender()
    }

    /// Cancels the pending commit, removes the subscription and detaches the root.
    pub fn unmount(self) -> Result<(), DetectorError> {
        adebug!(root = self.root.id(), "Host::unmount");
        let root = self.root;
        let mut detector = self.detector;
        let res = self.instance.will_unmount(&mut detector);
        root.detach();
        res
    }

    fn rerender(&mut self) -> Result<(), DetectorError> {
        let output = self.instance.render();
        if output.is_placeholder() != self.output.is_placeholder() {
            // Placeholder and content are distinct elements: swap the slot's root.
            self.root.detach();
            let root = Element::new(self.slot);
            root.attach();
            atrace!(from = self.root.id(), to = root.id(), "Host::rerender: root swapped");
            self.root = root;
        }
        if !output.is_placeholder() {
            self.renders += 1;
        }
        self.output = output;
        self.instance
            .did_update(self.root.clone(), &mut self.detector)
    }
}

impl<C, P> core::fmt::Debug for Host<C, P>
where
    C: Component<P>,
    P: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Host")
            .field("instance", &self.instance)
            .field("slot", &self.slot)
            .field("root", &self.root)
            .field("renders", &self.renders)
            .finish_non_exhaustive()
    }
}
