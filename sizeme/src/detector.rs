use alloc::rc::Rc;

use crate::BoxSize;

/// Callback registered with a [`ResizeDetector`]. Receives the element that may have resized.
pub type Listener<E> = Rc<dyn Fn(&E)>;

/// A rendered element whose layout box can be read.
pub trait Measure {
    fn measure(&self) -> BoxSize;
}

/// The host's element resize observation primitive.
///
/// Contract:
/// - `listen_to` may be called several times over an element's lifetime.
/// - Listeners are invoked asynchronously, never from within `listen_to`.
/// - A listener may fire for non-changes and must fire at least once per genuine change.
/// - `remove_all_listeners` is idempotent and safe on elements with no registrations.
///
/// Errors are surfaced to the caller unchanged; the wrapper has no recovery strategy for a
/// broken detector.
pub trait ResizeDetector<E> {
    type Error;

    fn listen_to(&mut self, element: &E, listener: Listener<E>) -> Result<(), Self::Error>;

    fn remove_all_listeners(&mut self, element: &E) -> Result<(), Self::Error>;
}

impl<E, D: ResizeDetector<E> + ?Sized> ResizeDetector<E> for &mut D {
    type Error = D::Error;

    fn listen_to(&mut self, element: &E, listener: Listener<E>) -> Result<(), Self::Error> {
        (**self).listen_to(element, listener)
    }

    fn remove_all_listeners(&mut self, element: &E) -> Result<(), Self::Error> {
        (**self).remove_all_listeners(element)
    }
}
