use crate::Size;

/// How bursts of size candidates are coalesced into commits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RefreshMode {
    /// At most one commit per window; the window opens on the first accepted candidate.
    #[default]
    Throttle,
    /// One commit after the candidates stop arriving for a full window.
    Debounce,
}

impl RefreshMode {
    pub fn policy(self) -> &'static dyn RefreshPolicy {
        match self {
            Self::Throttle => &Throttle,
            Self::Debounce => &Debounce,
        }
    }
}

/// A scheduling strategy for pending commits.
pub trait RefreshPolicy {
    /// Returns the commit deadline after a candidate arrives at `now_ms`.
    ///
    /// `pending_deadline_ms` is the deadline of the commit already scheduled, if any.
    fn deadline_ms(
        &self,
        pending_deadline_ms: Option<u64>,
        now_ms: u64,
        refresh_rate_ms: u64,
    ) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Throttle;

impl RefreshPolicy for Throttle {
    fn deadline_ms(
        &self,
        pending_deadline_ms: Option<u64>,
        now_ms: u64,
        refresh_rate_ms: u64,
    ) -> u64 {
        pending_deadline_ms.unwrap_or_else(|| now_ms.saturating_add(refresh_rate_ms))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Debounce;

impl RefreshPolicy for Debounce {
    fn deadline_ms(
        &self,
        _pending_deadline_ms: Option<u64>,
        now_ms: u64,
        refresh_rate_ms: u64,
    ) -> u64 {
        now_ms.saturating_add(refresh_rate_ms)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingCommit {
    candidate: Size,
    deadline_ms: u64,
}

/// Coalesces size candidates into at most one pending commit.
///
/// The scheduler never fires on its own: the owner calls [`UpdateScheduler::take_due`] when its
/// timer elapses (see [`UpdateScheduler::next_deadline_ms`]).
pub struct UpdateScheduler {
    policy: &'static dyn RefreshPolicy,
    refresh_rate_ms: u64,
    pending: Option<PendingCommit>,
}

impl UpdateScheduler {
    pub fn new(mode: RefreshMode, refresh_rate_ms: u64) -> Self {
        Self::with_policy(mode.policy(), refresh_rate_ms)
    }

    pub fn with_policy(policy: &'static dyn RefreshPolicy, refresh_rate_ms: u64) -> Self {
        Self {
            policy,
            refresh_rate_ms,
            pending: None,
        }
    }

    /// Remembers `candidate` as the latest value and (re)arms the deadline per policy.
    pub fn offer(&mut self, candidate: Size, now_ms: u64) {
        let deadline_ms = self.policy.deadline_ms(
            self.pending.map(|p| p.deadline_ms),
            now_ms,
            self.refresh_rate_ms,
        );
        strace!(now_ms, deadline_ms, "UpdateScheduler::offer");
        self.pending = Some(PendingCommit {
            candidate,
            deadline_ms,
        });
    }

    /// The latest candidate waiting to be committed.
    pub fn candidate(&self) -> Option<Size> {
        self.pending.map(|p| p.candidate)
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.pending.map(|p| p.deadline_ms)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the pending candidate if its deadline has been reached.
    pub fn take_due(&mut self, now_ms: u64) -> Option<Size> {
        match self.pending {
            Some(p) if now_ms >= p.deadline_ms => {
                self.pending = None;
                Some(p.candidate)
            }
            _ => None,
        }
    }

    /// Drops the pending commit. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

impl core::fmt::Debug for UpdateScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UpdateScheduler")
            .field("refresh_rate_ms", &self.refresh_rate_ms)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
