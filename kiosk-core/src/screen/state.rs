use core::fmt;

/// Screen currently shown on the kiosk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScreenState {
    /// Customer view with the join button and the current wait.
    #[default]
    UserMain,
    AdminLogin,
    AdminMain,
    /// Confirmation for a freshly issued ticket.
    TicketIssued,
    QueueFull,
    /// Call-customer modal. Painted and dismissable but nothing opens it.
    CallModal,
    QueueList,
    QueueDeleteConfirm,
    TimeSetting,
    PasswordChange,
}

impl ScreenState {
    pub const ALL: [ScreenState; 10] = [
        ScreenState::UserMain,
        ScreenState::AdminLogin,
        ScreenState::AdminMain,
        ScreenState::TicketIssued,
        ScreenState::QueueFull,
        ScreenState::CallModal,
        ScreenState::QueueList,
        ScreenState::QueueDeleteConfirm,
        ScreenState::TimeSetting,
        ScreenState::PasswordChange,
    ];

    /// Short lowercase label used in logs and console output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ScreenState::UserMain => "user-main",
            ScreenState::AdminLogin => "admin-login",
            ScreenState::AdminMain => "admin-main",
            ScreenState::TicketIssued => "ticket-issued",
            ScreenState::QueueFull => "queue-full",
            ScreenState::CallModal => "call-modal",
            ScreenState::QueueList => "queue-list",
            ScreenState::QueueDeleteConfirm => "queue-delete-confirm",
            ScreenState::TimeSetting => "time-setting",
            ScreenState::PasswordChange => "password-change",
        }
    }

    /// Screens that fall back to [`ScreenState::UserMain`] on their own.
    #[must_use]
    pub const fn auto_reverts(self) -> bool {
        matches!(self, ScreenState::TicketIssued | ScreenState::QueueFull)
    }

    /// Screens that show queue contents and need a repaint when it changes.
    #[must_use]
    pub const fn shows_queue(self) -> bool {
        matches!(self, ScreenState::UserMain | ScreenState::QueueList)
    }
}

impl fmt::Display for ScreenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
