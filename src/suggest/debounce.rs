//! Debounce state machine and timer identities.

use std::fmt;

/// Purpose of a timer armed by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Keystroke debounce before resolving suggestions.
    Debounce,
    /// Deferred dropdown close after the input loses focus.
    BlurClose,
}

/// Identity of one armed timer.
///
/// Generations increase monotonically per controller, so a late firing of a
/// cancelled timer can always be told apart from the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId {
    /// What the timer is for.
    pub kind: TimerKind,
    /// Generation at arming time.
    pub generation: u64,
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.kind, self.generation)
    }
}

/// Where the controller is between a keystroke and a rendered dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DebounceState {
    /// Nothing scheduled or outstanding.
    #[default]
    Idle,
    /// A debounce timer is armed.
    Pending {
        /// Generation of the armed timer.
        generation: u64,
    },
    /// A remote suggestion request is outstanding for `query`.
    InFlight {
        /// Value sent with the request.
        query: String,
    },
}

impl DebounceState {
    /// The armed timer, if one is pending.
    #[must_use]
    pub const fn pending_timer(&self) -> Option<TimerId> {
        match self {
            Self::Pending { generation } => Some(TimerId {
                kind: TimerKind::Debounce,
                generation: *generation,
            }),
            Self::Idle | Self::InFlight { .. } => None,
        }
    }

    /// Whether `timer` is the one currently armed.
    #[must_use]
    pub fn is_armed(&self, timer: TimerId) -> bool {
        timer.kind == TimerKind::Debounce
            && matches!(self, Self::Pending { generation } if *generation == timer.generation)
    }

    /// Whether a request for exactly `query` is outstanding.
    #[must_use]
    pub fn awaits(&self, query: &str) -> bool {
        matches!(self, Self::InFlight { query: q } if q == query)
    }
}
