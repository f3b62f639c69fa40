#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Open,
    LayoutReady,
    Close,
    TeardownDone,
}

impl Lifecycle {
    /// The whole transition table. `None` means the event does not apply.
    pub fn next(self, event: LifecycleEvent) -> Option<Self> {
        use Lifecycle::*;
        use LifecycleEvent as E;

        match (self, event) {
            (Closed, E::Open) => Some(Opening),
            (Opening, E::LayoutReady) => Some(Open),
            (Opening | Open, E::Close) => Some(Closing),
            (Closing, E::TeardownDone) => Some(Closed),
            _ => None,
        }
    }

    pub fn is_mounted(self) -> bool {
        matches!(self, Self::Opening | Self::Open)
    }
}
