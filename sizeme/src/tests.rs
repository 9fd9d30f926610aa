use crate::*;

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::Cell;
use std::format;

use proptest::prelude::*;

#[derive(Clone, Debug)]
struct Node {
    id: u32,
    rect: Rc<Cell<BoxSize>>,
    measures: Rc<Cell<usize>>,
}

impl Node {
    fn new(id: u32) -> Self {
        Self {
            id,
            rect: Rc::new(Cell::new(BoxSize::default())),
            measures: Rc::new(Cell::new(0)),
        }
    }

    fn resize(&self, width: u32, height: u32) {
        self.rect.set(BoxSize::new(width, height));
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Measure for Node {
    fn measure(&self) -> BoxSize {
        self.measures.set(self.measures.get() + 1);
        self.rect.get()
    }
}

#[derive(Default)]
struct RecordingDetector {
    listeners: Vec<(Node, Listener<Node>)>,
    listens: usize,
    removals: usize,
    fail_listen: bool,
    fail_remove: bool,
}

impl RecordingDetector {
    /// Delivers one notification to every listener registered for `node`.
    fn fire(&self, node: &Node) {
        for (n, l) in &self.listeners {
            if n == node {
                l(n);
            }
        }
    }
}

impl ResizeDetector<Node> for RecordingDetector {
    type Error = String;

    fn listen_to(&mut self, element: &Node, listener: Listener<Node>) -> Result<(), String> {
        if self.fail_listen {
            return Err("detector unavailable".to_string());
        }
        self.listens += 1;
        self.listeners.push((element.clone(), listener));
        Ok(())
    }

    fn remove_all_listeners(&mut self, element: &Node) -> Result<(), String> {
        if self.fail_remove {
            return Err("detector busy".to_string());
        }
        self.removals += 1;
        self.listeners.retain(|(n, _)| n != element);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Label {
    text: &'static str,
}

fn label_component(
    renders: Rc<Cell<usize>>,
) -> impl Fn(&Label, Size) -> (String, Size) + 'static {
    move |props: &Label, size: Size| {
        renders.set(renders.get() + 1);
        (props.text.to_string(), size)
    }
}

fn factory(options: SizeMeOptions, clock: &ManualClock) -> SizeMe {
    SizeMe::with_clock(options, clock.clone()).unwrap()
}

#[test]
fn default_options_validate() {
    let config = SizeMeOptions::default().validate().unwrap();
    assert!(config.monitor_width());
    assert!(config.monitor_height());
    assert_eq!(config.refresh_rate_ms(), 16);
    assert_eq!(config.refresh_mode(), RefreshMode::Throttle);
    assert!(!config.no_placeholder());
}

#[test]
fn refresh_rate_below_minimum_is_rejected() {
    let err = SizeMeOptions::default()
        .with_refresh_rate_ms(15)
        .validate()
        .unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::RefreshRateTooLow {
            refresh_rate_ms: 15,
            min_ms: 16
        }
    );
    assert!(format!("{err}").contains("refreshRate too low"));

    assert!(
        SizeMe::with_clock(
            SizeMeOptions::default().with_refresh_rate_ms(15),
            ManualClock::default()
        )
        .is_err()
    );
    assert!(
        SizeMeOptions::default()
            .with_refresh_rate_ms(16)
            .validate()
            .is_ok()
    );
}

#[test]
fn disabling_both_axes_is_rejected() {
    let err = SizeMeOptions::default()
        .with_monitor_width(false)
        .with_monitor_height(false)
        .validate()
        .unwrap_err();
    assert_eq!(err, ConfigurationError::NoAxisMonitored);
    assert!(format!("{err}").contains("no axis monitored"));

    assert!(
        SizeMeOptions::default()
            .with_monitor_width(false)
            .validate()
            .is_ok()
    );
}

#[test]
fn size_state_ignores_disabled_axis() {
    let mut s = SizeState::new(true, false);
    let extracted = s.extract(BoxSize::new(10, 20));
    assert_eq!(
        extracted,
        Size {
            width: Some(10),
            height: None
        }
    );

    assert!(s.commit(extracted));
    assert!(!s.differs(
        Size {
            width: Some(10),
            height: Some(999)
        },
        s.size()
    ));
    assert!(s.differs(Size::new(11, 20), s.size()));
}

#[test]
fn first_commit_accepts_zero_box() {
    let mut s = SizeState::new(true, true);
    assert_eq!(s.phase(), Phase::Unmeasured);
    let zero = s.extract(BoxSize::new(0, 0));
    assert!(s.differs(zero, s.size()));
    assert!(s.commit(zero));
    assert_eq!(s.phase(), Phase::Measured);
    assert_eq!(s.size(), Size::new(0, 0));

    // Same size again: no re-render, phase stays measured.
    assert!(!s.commit(zero));
    assert!(s.has_been_measured());
}

#[test]
fn throttle_keeps_the_first_deadline() {
    let mut sched = UpdateScheduler::new(RefreshMode::Throttle, 16);
    sched.offer(Size::new(1, 1), 100);
    sched.offer(Size::new(2, 2), 110);
    assert_eq!(sched.next_deadline_ms(), Some(116));
    assert_eq!(sched.take_due(115), None);
    assert_eq!(sched.take_due(116), Some(Size::new(2, 2)));
    assert!(!sched.is_pending());
}

#[test]
fn debounce_moves_the_deadline() {
    let mut sched = UpdateScheduler::new(RefreshMode::Debounce, 20);
    sched.offer(Size::new(1, 1), 100);
    sched.offer(Size::new(2, 2), 110);
    assert_eq!(sched.next_deadline_ms(), Some(130));
    assert_eq!(sched.take_due(125), None);
    assert_eq!(sched.take_due(130), Some(Size::new(2, 2)));
}

#[test]
fn scheduler_cancel_drops_pending_commit() {
    let mut sched = UpdateScheduler::new(RefreshMode::Throttle, 16);
    assert!(!sched.cancel());
    sched.offer(Size::new(1, 1), 0);
    assert!(sched.cancel());
    assert_eq!(sched.take_due(1_000), None);
}

#[test]
fn bare_placeholder_has_only_stretch_styling() {
    let p = Placeholder::new(None, None);
    assert!(p.is_bare());
    assert_eq!(p, Placeholder::default());
    assert_eq!(p.computed_style(), Placeholder::stretch_style());
    assert_eq!(p.computed_style().get("width"), Some("100%"));
    assert_eq!(p.computed_style().get("height"), Some("100%"));
    assert_eq!(p.computed_style().get("visibility"), Some("hidden"));
}

#[test]
fn placeholder_forwards_exactly_the_pass_through_props() {
    let p = Placeholder::new(Some("foo"), None);
    assert_eq!(p.class_name.as_deref(), Some("foo"));
    assert_eq!(p.style, None);

    let style = Style::new().with("height", "20px");
    let p = Placeholder::new(None, Some(&style));
    assert_eq!(p.class_name, None);
    assert_eq!(p.style.as_ref(), Some(&style));
    assert_eq!(p.computed_style().get("height"), Some("20px"));
    assert_eq!(p.computed_style().len(), Placeholder::stretch_style().len());
}

#[test]
fn mount_subscribes_once_and_unmount_removes_once() {
    let clock = ManualClock::default();
    let renders = Rc::new(Cell::new(0));
    let wrapped = factory(SizeMeOptions::default(), &clock).wrap(label_component(renders.clone()));
    let mut detector = RecordingDetector::default();

    let mut inst = wrapped.instantiate(SizeMeProps::new(Label { text: "a" }));
    assert!(inst.render().is_placeholder());
    assert_eq!(renders.get(), 0);

    let root = Node::new(1);
    inst.did_mount(root.clone(), &mut detector).unwrap();
    assert_eq!(detector.listens, 1);
    assert_eq!(detector.removals, 0);

    inst.will_unmount(&mut detector).unwrap();
    assert_eq!(detector.listens, 1);
    assert_eq!(detector.removals, 1);
    assert!(detector.listeners.is_empty());
}

#[test]
fn placeholder_swaps_to_content_after_window() {
    let clock = ManualClock::new(1_000);
    let renders = Rc::new(Cell::new(0));
    let wrapped = factory(SizeMeOptions::default(), &clock).wrap(label_component(renders.clone()));
    let mut detector = RecordingDetector::default();

    let mut inst = wrapped.instantiate(SizeMeProps::new(Label { text: "a" }));
    let root = Node::new(1);
    inst.did_mount(root.clone(), &mut detector).unwrap();

    root.resize(100, 100);
    detector.fire(&root);
    assert!(inst.is_pending());
    assert_eq!(inst.next_deadline_ms(), Some(1_016));

    clock.advance(15);
    assert!(!inst.poll());
    assert!(inst.render().is_placeholder());

    clock.advance(1);
    assert!(inst.poll());
    assert_eq!(inst.phase(), Phase::Measured);
    let out = inst.render().into_content().unwrap();
    assert_eq!(out, ("a".to_string(), Size::new(100, 100)));
    assert_eq!(renders.get(), 1);

    // Duplicate notification: nothing scheduled, nothing to re-render.
    detector.fire(&root);
    assert!(!inst.is_pending());
    clock.advance(100);
    assert!(!inst.poll());
    assert_eq!(renders.get(), 1);
}

#[test]
fn throttle_commits_only_the_latest_candidate() {
    let clock = ManualClock::default();
    let wrapped = factory(SizeMeOptions::default(), &clock)
        .wrap(|_: &(), size: Size| size);
    let mut detector = RecordingDetector::default();
    let mut inst = wrapped.instantiate::<(), Node>(SizeMeProps::new(()));
    let root = Node::new(7);
    inst.did_mount(root.clone(), &mut detector).unwrap();

    root.resize(100, 100);
    detector.fire(&root);
    clock.advance(5);
    root.resize(200, 200);
    detector.fire(&root);

    clock.advance(11);
    let mut commits = Vec::new();
    if inst.poll() {
        commits.push(inst.size());
    }
    clock.advance(100);
    if inst.poll() {
        commits.push(inst.size());
    }
    assert_eq!(commits, [Size::new(200, 200)]);
}

#[test]
fn debounce_waits_for_quiet_period() {
    let clock = ManualClock::default();
    let wrapped = factory(
        SizeMeOptions::default()
            .with_refresh_mode(RefreshMode::Debounce)
            .with_refresh_rate_ms(50),
        &clock,
    )
    .wrap(|_: &(), size: Size| size);
    let mut detector = RecordingDetector::default();
    let mut inst = wrapped.instantiate::<(), Node>(SizeMeProps::new(()));
    let root = Node::new(1);
    inst.did_mount(root.clone(), &mut detector).unwrap();

    for w in [10u32, 20, 30, 40] {
        root.resize(w, 5);
        detector.fire(&root);
        clock.advance(40);
        assert!(!inst.poll());
    }
    clock.advance(10);
    assert!(inst.poll());
    assert_eq!(inst.size(), Size::new(40, 5));
}

#[test]
fn no_placeholder_renders_content_immediately() {
    let clock = ManualClock::default();
    let wrapped = factory(SizeMeOptions::default().with_no_placeholder(true), &clock)
        .wrap(|_: &(), size: Size| size);
    let mut detector = RecordingDetector::default();
    let mut inst = wrapped.instantiate::<(), Node>(SizeMeProps::new(()).with_class_name("x"));

    assert_eq!(inst.render(), Rendered::Content(Size::UNMEASURED));
    let root = Node::new(3);
    inst.did_mount(root.clone(), &mut detector).unwrap();
    assert_eq!(inst.element(), Some(&root));

    root.resize(8, 9);
    detector.fire(&root);
    clock.advance(16);
    assert!(inst.poll());
    assert_eq!(inst.render(), Rendered::Content(Size::new(8, 9)));
}

#[test]
fn prop_update_keeps_measured_size() {
    let clock = ManualClock::default();
    let renders = Rc::new(Cell::new(0));
    let wrapped = factory(SizeMeOptions::default(), &clock).wrap(label_component(renders.clone()));
    let mut detector = RecordingDetector::default();
    let mut inst = wrapped.instantiate(SizeMeProps::new(Label { text: "before" }));
    let root = Node::new(1);
    inst.did_mount(root.clone(), &mut detector).unwrap();

    root.resize(30, 40);
    detector.fire(&root);
    clock.advance(16);
    assert!(inst.poll());

    inst.update_props(|p| p.props.text = "after");
    let out = inst.render().into_content().unwrap();
    assert_eq!(out, ("after".to_string(), Size::new(30, 40)));
    assert_eq!(detector.listens, 1);
}

#[test]
fn root_swap_moves_the_subscription_once() {
    let clock = ManualClock::default();
    let wrapped = factory(SizeMeOptions::default(), &clock).wrap(|_: &(), size: Size| size);
    let mut detector = RecordingDetector::default();
    let mut inst = wrapped.instantiate::<(), Node>(SizeMeProps::new(()));
    let placeholder = Node::new(1);
    inst.did_mount(placeholder.clone(), &mut detector).unwrap();

    placeholder.resize(50, 60);
    detector.fire(&placeholder);
    clock.advance(16);
    assert!(inst.poll());

    let content = Node::new(2);
    content.resize(50, 60);
    inst.did_update(content.clone(), &mut detector).unwrap();
    inst.did_update(content.clone(), &mut detector).unwrap();
    assert_eq!(detector.listens, 2);
    assert_eq!(detector.removals, 1);
    assert_eq!(inst.element(), Some(&content));

    // The content root reports the same box: no new candidate.
    detector.fire(&content);
    assert!(!inst.is_pending());

    inst.will_unmount(&mut detector).unwrap();
    assert_eq!(detector.removals, 2);
    assert!(detector.listeners.is_empty());
}

#[test]
fn unmount_cancels_pending_commit_and_silences_listener() {
    let clock = ManualClock::default();
    let wrapped = factory(SizeMeOptions::default(), &clock).wrap(|_: &(), size: Size| size);
    let mut detector = RecordingDetector::default();
    let mut inst = wrapped.instantiate::<(), Node>(SizeMeProps::new(()));
    let root = Node::new(1);
    inst.did_mount(root.clone(), &mut detector).unwrap();

    root.resize(10, 10);
    detector.fire(&root);
    assert!(inst.is_pending());

    let stale = detector.listeners[0].1.clone();
    inst.will_unmount(&mut detector).unwrap();
    assert!(detector.listeners.is_empty());

    // A late delivery from the platform must not reach released state: the listener no longer
    // upgrades its handle, so the element is never even measured.
    let measured = root.measures.get();
    root.resize(20, 20);
    stale(&root);
    assert_eq!(root.measures.get(), measured);
    assert_eq!(detector.listens, 1);
}

#[test]
fn failed_root_swap_keeps_the_old_root_tracked() {
    let clock = ManualClock::default();
    let wrapped = factory(SizeMeOptions::default(), &clock).wrap(|_: &(), size: Size| size);
    let mut detector = RecordingDetector::default();
    let mut inst = wrapped.instantiate::<(), Node>(SizeMeProps::new(()));
    let placeholder = Node::new(1);
    inst.did_mount(placeholder.clone(), &mut detector).unwrap();

    detector.fail_remove = true;
    let err = inst.did_update(Node::new(2), &mut detector).unwrap_err();
    assert_eq!(err, "detector busy");
    assert_eq!(inst.element(), Some(&placeholder));
    assert_eq!(detector.listens, 1);

    detector.fail_remove = false;
    inst.will_unmount(&mut detector).unwrap();
    assert_eq!(detector.removals, 1);
    assert!(detector.listeners.is_empty());
}

#[test]
fn width_only_ignores_height_changes() {
    let clock = ManualClock::default();
    let wrapped = factory(SizeMeOptions::default().with_monitor_height(false), &clock)
        .wrap(|_: &(), size: Size| size);
    let mut detector = RecordingDetector::default();
    let mut inst = wrapped.instantiate::<(), Node>(SizeMeProps::new(()));
    let root = Node::new(1);
    inst.did_mount(root.clone(), &mut detector).unwrap();

    root.resize(10, 10);
    detector.fire(&root);
    clock.advance(16);
    assert!(inst.poll());
    assert_eq!(
        inst.size(),
        Size {
            width: Some(10),
            height: None
        }
    );

    root.resize(10, 500);
    detector.fire(&root);
    assert!(!inst.is_pending());
}

#[test]
fn burst_returning_to_committed_size_skips_render() {
    let clock = ManualClock::default();
    let wrapped = factory(SizeMeOptions::default(), &clock).wrap(|_: &(), size: Size| size);
    let mut detector = RecordingDetector::default();
    let mut inst = wrapped.instantiate::<(), Node>(SizeMeProps::new(()));
    let root = Node::new(1);
    inst.did_mount(root.clone(), &mut detector).unwrap();

    root.resize(100, 100);
    detector.fire(&root);
    clock.advance(16);
    assert!(inst.poll());

    root.resize(200, 200);
    detector.fire(&root);
    root.resize(100, 100);
    detector.fire(&root);
    assert!(inst.is_pending());

    clock.advance(16);
    assert!(!inst.poll());
    assert_eq!(inst.size(), Size::new(100, 100));
}

#[test]
fn on_size_sees_every_commit() {
    use std::sync::{Arc, Mutex};

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let clock = ManualClock::default();
    let wrapped = factory(
        SizeMeOptions::default().with_on_size(Some(move |size: Size| {
            sink.lock().unwrap().push(size);
        })),
        &clock,
    )
    .wrap(|_: &(), size: Size| size);
    let mut detector = RecordingDetector::default();
    let mut inst = wrapped.instantiate::<(), Node>(SizeMeProps::new(()));
    let root = Node::new(1);
    inst.did_mount(root.clone(), &mut detector).unwrap();

    for w in [1u32, 2] {
        root.resize(w, w);
        detector.fire(&root);
        clock.advance(16);
        assert!(inst.poll());
    }
    assert_eq!(*seen.lock().unwrap(), [Size::new(1, 1), Size::new(2, 2)]);
}

#[test]
fn detector_errors_propagate() {
    let clock = ManualClock::default();
    let wrapped = factory(SizeMeOptions::default(), &clock).wrap(|_: &(), size: Size| size);
    let mut detector = RecordingDetector {
        fail_listen: true,
        ..Default::default()
    };
    let mut inst = wrapped.instantiate::<(), Node>(SizeMeProps::new(()));
    let err = inst.did_mount(Node::new(1), &mut detector).unwrap_err();
    assert_eq!(err, "detector unavailable");
    assert_eq!(inst.element(), None);
}

#[test]
fn closure_clock_drives_scheduling() {
    let now = Rc::new(Cell::new(0u64));
    let source = now.clone();
    let wrapped = SizeMe::with_clock(SizeMeOptions::default(), move || source.get())
        .unwrap()
        .wrap(|_: &(), size: Size| size);
    let mut detector = RecordingDetector::default();
    let mut inst = wrapped.instantiate::<(), Node>(SizeMeProps::new(()));
    let root = Node::new(1);
    inst.did_mount(root.clone(), &mut detector).unwrap();

    root.resize(4, 4);
    detector.fire(&root);
    now.set(16);
    assert!(inst.poll());
}

proptest! {
    #[test]
    fn throttle_never_commits_an_intermediate_candidate(
        widths in proptest::collection::vec(1u32..500, 1..20),
        gaps in proptest::collection::vec(0u64..4, 20),
    ) {
        // All candidates arrive well inside one window.
        let mut sched = UpdateScheduler::new(RefreshMode::Throttle, 100);
        let mut now = 0u64;
        for (i, w) in widths.iter().enumerate() {
            sched.offer(Size::new(*w, 1), now);
            now += gaps[i];
        }
        prop_assert_eq!(sched.next_deadline_ms(), Some(100));
        prop_assert_eq!(sched.take_due(99), None);
        let last = *widths.last().unwrap();
        prop_assert_eq!(sched.take_due(100), Some(Size::new(last, 1)));
        prop_assert_eq!(sched.take_due(10_000), None);
    }

    #[test]
    fn debounce_deadline_trails_the_last_candidate(
        gaps in proptest::collection::vec(0u64..50, 1..20),
    ) {
        let mut sched = UpdateScheduler::new(RefreshMode::Debounce, 50);
        let mut now = 0u64;
        for gap in &gaps {
            now += gap;
            sched.offer(Size::new(now as u32, 1), now);
        }
        prop_assert_eq!(sched.next_deadline_ms(), Some(now + 50));
        prop_assert_eq!(sched.take_due(now + 49), None);
        prop_assert_eq!(sched.take_due(now + 50), Some(Size::new(now as u32, 1)));
    }
}

#[cfg(feature = "std")]
#[test]
fn system_clock_starts_near_zero_and_never_goes_back() {
    let clock = SystemClock::new();
    let first = clock.now_ms();
    let second = clock.now_ms();
    assert!(first < 60_000);
    assert!(second >= first);
}
