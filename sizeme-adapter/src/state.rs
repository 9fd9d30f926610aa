/// A lightweight, serializable snapshot of the detector registry.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectorStats {
    /// Total `listen_to` calls accepted.
    pub listens: usize,
    /// Total `remove_all_listeners` calls.
    pub removals: usize,
    /// Listeners currently registered across all elements.
    pub listeners: usize,
    /// Notifications waiting for the next `flush`.
    pub queued: usize,
}
