//! Data models for gateway storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Physical device identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(pub i64);

/// User identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Opaque session credential handed to the client
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(pub String);

/// The current session of a user. At most one exists per user.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub token: SessionToken,
    pub created_at: DateTime<Utc>,
}

/// Association permitting a device to start a login for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceUserBinding {
    pub device_id: DeviceId,
    pub user_id: UserId,
}

/// Dashboard widget kinds, in the order they are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Twitter,
    Gmail,
    Tasks,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 3] = [WidgetKind::Twitter, WidgetKind::Gmail, WidgetKind::Tasks];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Twitter => "Twitter",
            WidgetKind::Gmail => "Gmail",
            WidgetKind::Tasks => "Tasks",
        }
    }

    /// The third-party provider whose login status gates this widget
    pub fn provider(&self) -> Provider {
        match self {
            WidgetKind::Twitter => Provider::Timeline,
            WidgetKind::Gmail | WidgetKind::Tasks => Provider::Mail,
        }
    }
}

/// Third-party providers the gateway talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Social timeline (twitter)
    Timeline,
    /// Mail and tasks (google)
    Mail,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Timeline => "twitter",
            Provider::Mail => "google",
        }
    }
}

/// Position and size of one widget. A non-positive width disables it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl Placement {
    pub fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_enabled(&self) -> bool {
        self.w > 0
    }
}

/// Per-user dashboard layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserConfig {
    pub user_id: UserId,
    pub twitter: Placement,
    pub gmail: Placement,
    pub tasks: Placement,
}

impl UserConfig {
    /// A layout with every widget disabled
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            twitter: Placement::default(),
            gmail: Placement::default(),
            tasks: Placement::default(),
        }
    }

    pub fn placement(&self, kind: WidgetKind) -> Placement {
        match kind {
            WidgetKind::Twitter => self.twitter,
            WidgetKind::Gmail => self.gmail,
            WidgetKind::Tasks => self.tasks,
        }
    }
}
