pub const DEFAULT_COLOR: &str = "#6b7280";

///
/// Type of the notification.
/// Types unknown to the client are kept as [NotificationKind::Other] and never rejected.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    CourseUpdated,
    CourseStarted,
    CourseCompleted,
    Reminder,
    Other(String),
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::CourseUpdated => "course_updated",
            Self::CourseStarted => "course_started",
            Self::CourseCompleted => "course_completed",
            Self::Reminder => "reminder",
            Self::Other(kind) => kind,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::CourseUpdated => "Course Updated",
            Self::CourseStarted => "Course Started",
            Self::CourseCompleted => "Course Completed",
            Self::Reminder => "Reminder",
            Self::Other(kind) => kind,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::CourseUpdated => "#3b82f6",
            Self::CourseStarted => "#10b981",
            Self::CourseCompleted => "#8b5cf6",
            Self::Reminder => "#f59e0b",
            Self::Other(_) => DEFAULT_COLOR,
        }
    }
}

impl From<String> for NotificationKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "course_updated" => Self::CourseUpdated,
            "course_started" => Self::CourseStarted,
            "course_completed" => Self::CourseCompleted,
            "reminder" => Self::Reminder,
            _ => Self::Other(value),
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
