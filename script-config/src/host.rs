use crate::errors::ConfigError;
use log::{error, info, warn};
use serde_derive::{Deserialize, Serialize};
use std::{cell::RefCell, fmt::Display, str::FromStr};

/// Severity of a message in the host console.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

/// Host application version, like `2025` or `2025.1.2`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct HostVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}
impl HostVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}
impl FromStr for HostVersion {
    type Err = ConfigError;

    /// Missing minor and patch parts are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ConfigError::Configuration(format!("Invalid host version: {s:?}"))
        };
        let mut parts = [0_u32; 3];
        let mut count = 0;
        for part in s.trim().split('.') {
            if count == parts.len() {
                return Err(invalid());
            }
            parts[count] = part.parse().map_err(|_| invalid())?;
            count += 1;
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}
impl TryFrom<String> for HostVersion {
    type Error = ConfigError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
impl From<HostVersion> for String {
    fn from(value: HostVersion) -> Self {
        value.to_string()
    }
}
impl Display for HostVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.minor, self.patch) {
            (0, 0) => write!(f, "{}", self.major),
            (minor, 0) => write!(f, "{}.{}", self.major, minor),
            (minor, patch) => write!(f, "{}.{}.{}", self.major, minor, patch),
        }
    }
}

/// What scripts need from the host application.
pub trait Host {
    /// Post transient text to the host console.
    fn show_console_msg(&self, msg: &str, kind: MessageKind, duration_secs: u32);
    fn version(&self) -> HostVersion;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
    pub text: String,
    pub kind: MessageKind,
    pub duration_secs: u32,
}

/// Host, living in the current process.
///
/// Keeps every message and mirrors it to the log. Used when scripts run
/// outside the application, e.g. in tests.
#[derive(Debug)]
pub struct MemoryHost {
    version: HostVersion,
    messages: RefCell<Vec<ConsoleMessage>>,
}
impl MemoryHost {
    pub fn new(version: HostVersion) -> Self {
        Self {
            version,
            messages: RefCell::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<ConsoleMessage> {
        self.messages.borrow().clone()
    }

    pub fn clear_console(&self) {
        self.messages.borrow_mut().clear()
    }
}
impl Host for MemoryHost {
    fn show_console_msg(&self, msg: &str, kind: MessageKind, duration_secs: u32) {
        match kind {
            MessageKind::Info => info!("{}", msg),
            MessageKind::Warning => warn!("{}", msg),
            MessageKind::Error => error!("{}", msg),
        }
        self.messages.borrow_mut().push(ConsoleMessage {
            text: msg.to_string(),
            kind,
            duration_secs,
        });
    }

    fn version(&self) -> HostVersion {
        self.version
    }
}
