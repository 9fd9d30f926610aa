use alloc::rc::Rc;
use core::cell::Cell;
use core::sync::atomic::{AtomicUsize, Ordering};

use sizeme::{BoxSize, Measure};

// Pointer-width atomics exist on every target with `alloc`, unlike `AtomicU64`.
static NEXT_ELEMENT_ID: AtomicUsize = AtomicUsize::new(1);

/// A rendered element handle with a host-controlled layout box.
///
/// Clones refer to the same element; equality is identity.
#[derive(Clone, Debug)]
pub struct Element {
    id: u64,
    rect: Rc<Cell<BoxSize>>,
    attached: Rc<Cell<bool>>,
}

impl Element {
    /// Creates a detached element with the given layout box.
    pub fn new(rect: BoxSize) -> Self {
        Self {
            id: NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed) as u64,
            rect: Rc::new(Cell::new(rect)),
            attached: Rc::new(Cell::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn rect(&self) -> BoxSize {
        self.rect.get()
    }

    pub fn set_rect(&self, rect: BoxSize) {
        self.rect.set(rect);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    pub fn attach(&self) {
        self.attached.set(true);
    }

    pub fn detach(&self) {
        self.attached.set(false);
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Element {}

impl Measure for Element {
    fn measure(&self) -> BoxSize {
        self.rect.get()
    }
}
