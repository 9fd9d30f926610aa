use sizeme::{BoxSize, ManualClock, RefreshMode, Size, SizeMe, SizeMeOptions, SizeMeProps};
use sizeme_adapter::{ElementResizeDetector, Host};

fn main() {
    // Example: an adapter driving one size-aware component without holding any UI objects.
    //
    // An adapter would:
    // - mount the wrapped component into a parent slot (a placeholder is rendered first)
    // - call resize_slot when the parent's layout changes
    // - call tick in a frame loop / timer (delivers notifications, commits due sizes)
    // - draw whatever `output()` holds after a tick that re-rendered
    let clock = ManualClock::default();
    let options = SizeMeOptions::default()
        .with_refresh_mode(RefreshMode::Throttle)
        .with_refresh_rate_ms(32)
        .with_on_size(Some(|size: Size| println!("on_size: {size:?}")));
    let wrapped = SizeMe::with_clock(options, clock.clone())
        .expect("valid options")
        .wrap(|title: &&str, size: Size| {
            format!("{title} ({:?} x {:?})", size.width, size.height)
        });

    let detector = ElementResizeDetector::new();
    let mut host = Host::mount(
        &wrapped,
        SizeMeProps::new("panel").with_class_name("panel-slot"),
        BoxSize::new(320, 200),
        detector.clone(),
    )
    .expect("mount");
    println!("mounted: placeholder={}", host.output().is_placeholder());

    // A drag-resize: the slot grows every frame for a while, then settles.
    let mut now_ms = 0u64;
    for frame in 0..30u32 {
        now_ms += 16;
        clock.set(now_ms);
        if frame < 20 {
            host.resize_slot(BoxSize::new(320 + frame * 8, 200));
        }
        if host.tick().expect("tick") {
            println!(
                "t={now_ms} rendered={:?}",
                host.output().content().map(String::as_str)
            );
        }
    }

    println!("renders={} stats={:?}", host.renders(), detector.stats());
    host.unmount().expect("unmount");
    println!("after unmount: {:?}", detector.stats());
}
