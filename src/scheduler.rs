use crate::dom::NodeId;

/// Work a timer performs when it fires. Plain data so pending timers can be
/// inspected, cloned, and replayed deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TimerAction {
    /// Draw a canned support response and append it to the chat transcript.
    ChatReply,
    /// Complete the simulated form submission: reset fields, restore the
    /// submit button, show the success notice.
    FinishSubmission,
    /// Remove a transient notice element.
    DismissNotice(NodeId),
    /// Deferred scroll to the emergency block after "Get Help Now".
    RevealEmergencySection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) action: TimerAction,
}

/// Inspection snapshot of a queued timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
}
