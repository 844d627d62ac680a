//! Session lifecycle status mapping to the `session_statuses` lookup table.
//!
//! Discriminants match the seed data order (1-based) in the migration.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

/// Practice-session lifecycle status.
///
/// `Started` and `Recording` are both pre-upload and are treated
/// identically by the single-active-session rule.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Started = 1,
    Recording = 2,
    Analyzing = 3,
    Completed = 4,
    Failed = 5,
}

impl SessionStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Resolve a database status ID back to the enum.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Started),
            2 => Some(Self::Recording),
            3 => Some(Self::Analyzing),
            4 => Some(Self::Completed),
            5 => Some(Self::Failed),
            _ => None,
        }
    }

    /// Lookup-table name, also used in API payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Recording => "recording",
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// A session in an active status counts against the
    /// one-active-session-per-user rule.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Started | Self::Recording | Self::Analyzing)
    }

    /// Terminal sessions are immutable.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Transitions are monotone forward-only: a session can never move
    /// backwards or leave a terminal status.
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        !self.is_terminal() && next.id() > self.id()
    }
}

impl From<SessionStatus> for StatusId {
    fn from(value: SessionStatus) -> Self {
        value as StatusId
    }
}
