/// Errors reported by [`crate::ElementResizeDetector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DetectorError {
    #[error("element {id} is not attached to the tree")]
    Detached { id: u64 },
}
