use alloc::rc::Rc;
use core::cell::RefCell;

use crate::{
    BoxSize, Clock, Component, Listener, Measure, Phase, Placeholder, Rendered, ResizeDetector,
    Size, SizeMeConfig, SizeMeProps, SizeState, UpdateScheduler,
};

/// Mutable state shared between an instance and its detector listener.
#[derive(Debug)]
struct Tracker {
    state: SizeState,
    scheduler: UpdateScheduler,
}

impl Tracker {
    fn new(config: &SizeMeConfig) -> Self {
        Self {
            state: SizeState::new(config.monitor_width(), config.monitor_height()),
            scheduler: UpdateScheduler::new(config.refresh_mode(), config.refresh_rate_ms()),
        }
    }

    /// Returns whether the notification produced a new candidate.
    fn on_possible_resize(&mut self, raw: BoxSize, now_ms: u64) -> bool {
        let candidate = self.state.extract(raw);
        let latest = self
            .scheduler
            .candidate()
            .unwrap_or_else(|| self.state.size());
        if !self.state.differs(candidate, latest) {
            strace!(
                width = raw.width,
                height = raw.height,
                "on_possible_resize: unchanged"
            );
            return false;
        }
        strace!(
            width = raw.width,
            height = raw.height,
            now_ms,
            "on_possible_resize: candidate"
        );
        self.scheduler.offer(candidate, now_ms);
        true
    }

    fn poll(&mut self, now_ms: u64) -> Option<Size> {
        let candidate = self.scheduler.take_due(now_ms)?;
        if self.state.commit(candidate) {
            Some(candidate)
        } else {
            strace!(now_ms, "poll: candidate matches committed size");
            None
        }
    }
}

/// A mounted (or about to be mounted) size-aware component.
///
/// Lifecycle, driven by the host:
/// 1. [`Instance::render`], then attach the output to the live tree.
/// 2. [`Instance::did_mount`] with the rendered root: subscribes to resize notifications.
/// 3. Whenever the host timer reaches [`Instance::next_deadline_ms`], call [`Instance::poll`];
///    re-render when it returns `true`.
/// 4. After every re-render, [`Instance::did_update`] with the (possibly new) root.
/// 5. [`Instance::will_unmount`] cancels the pending commit and the subscription.
///
/// The detector listener only holds a weak reference to the instance state, so notifications
/// delivered after unmount are ignored.
pub struct Instance<C, P, E> {
    component: Rc<C>,
    config: SizeMeConfig,
    clock: Rc<dyn Clock>,
    props: SizeMeProps<P>,
    tracker: Rc<RefCell<Tracker>>,
    element: Option<E>,
}

impl<C, P, E> Instance<C, P, E> {
    pub(crate) fn new(
        component: Rc<C>,
        config: SizeMeConfig,
        clock: Rc<dyn Clock>,
        props: SizeMeProps<P>,
    ) -> Self {
        let tracker = Rc::new(RefCell::new(Tracker::new(&config)));
        Self {
            component,
            config,
            clock,
            props,
            tracker,
            element: None,
        }
    }

    pub fn config(&self) -> &SizeMeConfig {
        &self.config
    }

    pub fn props(&self) -> &SizeMeProps<P> {
        &self.props
    }

    /// Replaces the props. The current size and the subscription are kept; re-render to apply.
    pub fn set_props(&mut self, props: SizeMeProps<P>) {
        self.props = props;
    }

    pub fn update_props(&mut self, f: impl FnOnce(&mut SizeMeProps<P>)) {
        f(&mut self.props);
    }

    /// The last committed size.
    pub fn size(&self) -> Size {
        self.tracker.borrow().state.size()
    }

    pub fn phase(&self) -> Phase {
        self.tracker.borrow().state.phase()
    }

    pub fn has_been_measured(&self) -> bool {
        self.tracker.borrow().state.has_been_measured()
    }

    pub fn is_pending(&self) -> bool {
        self.tracker.borrow().scheduler.is_pending()
    }

    /// When the pending commit becomes due, if any. Hosts arm their timer with this.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.tracker.borrow().scheduler.next_deadline_ms()
    }

    /// The element currently subscribed to the detector.
    pub fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    /// Whether the next render produces the placeholder.
    pub fn renders_placeholder(&self) -> bool {
        !self.config.no_placeholder() && !self.has_been_measured()
    }

    /// Commits the pending candidate if its deadline has passed.
    ///
    /// Returns `true` when the committed size changed and the host must re-render once.
    pub fn poll(&mut self) -> bool {
        let now_ms = self.clock.now_ms();
        let Some(size) = self.tracker.borrow_mut().poll(now_ms) else {
            return false;
        };
        sdebug!(
            width = size.width,
            height = size.height,
            now_ms,
            "Instance::poll: committed"
        );
        if let Some(on_size) = self.config.on_size() {
            on_size(size);
        }
        true
    }
}

impl<C, P, E> Instance<C, P, E>
where
    C: Component<P>,
{
    /// Renders the placeholder while unmeasured, otherwise the wrapped component with the current
    /// size injected.
    pub fn render(&self) -> Rendered<C::Output> {
        if self.renders_placeholder() {
            return Rendered::Placeholder(Placeholder::new(
                self.props.class_name.as_deref(),
                self.props.style.as_ref(),
            ));
        }
        let size = self.size();
        Rendered::Content(self.component.render(&self.props.props, size))
    }
}

impl<C, P, E> Instance<C, P, E>
where
    E: Measure + PartialEq + 'static,
{
    /// Subscribes to resize notifications for the rendered root.
    ///
    /// Call after the output of the first [`Instance::render`] is attached to the live tree.
    pub fn did_mount<D>(&mut self, root: E, detector: &mut D) -> Result<(), D::Error>
    where
        D: ResizeDetector<E> + ?Sized,
    {
        sdebug!(
            no_placeholder = self.config.no_placeholder(),
            "Instance::did_mount"
        );
        self.attach(root, detector)
    }

    /// Call after every re-render with the current root.
    ///
    /// The subscription moves only when the root changed identity (placeholder swapped for the
    /// wrapped content); otherwise this is a no-op.
    pub fn did_update<D>(&mut self, root: E, detector: &mut D) -> Result<(), D::Error>
    where
        D: ResizeDetector<E> + ?Sized,
    {
        self.attach(root, detector)
    }

    /// Cancels the pending commit, removes the subscription and releases the instance state.
    pub fn will_unmount<D>(self, detector: &mut D) -> Result<(), D::Error>
    where
        D: ResizeDetector<E> + ?Sized,
    {
        if self.tracker.borrow_mut().scheduler.cancel() {
            sdebug!("Instance::will_unmount: cancelled pending commit");
        }
        match &self.element {
            Some(element) => detector.remove_all_listeners(element),
            None => Ok(()),
        }
    }

    fn attach<D>(&mut self, root: E, detector: &mut D) -> Result<(), D::Error>
    where
        D: ResizeDetector<E> + ?Sized,
    {
        if self.element.as_ref() == Some(&root) {
            return Ok(());
        }
        // The old root stays tracked until both detector calls succeed, so a failed swap can
        // still be deregistered by `will_unmount`.
        if let Some(prev) = self.element.as_ref() {
            strace!("Instance::attach: root changed, moving subscription");
            detector.remove_all_listeners(prev)?;
        }
        detector.listen_to(&root, self.listener())?;
        self.element = Some(root);
        Ok(())
    }

    fn listener(&self) -> Listener<E> {
        let tracker = Rc::downgrade(&self.tracker);
        let clock = Rc::clone(&self.clock);
        Rc::new(move |element: &E| {
            let Some(tracker) = tracker.upgrade() else {
                swarn!("resize listener fired after unmount");
                return;
            };
            let raw = element.measure();
            tracker.borrow_mut().on_possible_resize(raw, clock.now_ms());
        })
    }
}

impl<C, P: core::fmt::Debug, E: core::fmt::Debug> core::fmt::Debug for Instance<C, P, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Instance")
            .field("props", &self.props)
            .field("tracker", &self.tracker)
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}
