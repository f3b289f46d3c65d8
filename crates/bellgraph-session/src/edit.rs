use bellgraph_core::StateId;

/// What a canvas click means right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Idle,
    AddingStates,
    AddingTransitions,
}

impl EditMode {
    /// Flip into `target`, or back to `Idle` if already there.
    pub(crate) fn toggled(self, target: EditMode) -> EditMode {
        if self == target { EditMode::Idle } else { target }
    }
}

/// Result of routing one canvas click through the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    StateAdded(StateId),
    /// First endpoint of a transition picked, waiting for the second.
    SourceSelected(StateId),
    /// Both endpoints picked; the caller collects reward/action/probability next.
    TransitionReady { from: StateId, to: StateId },
    Ignored,
}
