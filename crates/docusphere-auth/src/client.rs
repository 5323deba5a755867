//! Client detection from the `User-Agent` header.
//!
//! Only the coarse families the login dashboard groups by are recognised;
//! anything else is reported as `Unknown`.

use serde::{Deserialize, Serialize};

/// Device class reported when nothing more specific matches.
pub const DEFAULT_DEVICE: &str = "desktop";

/// Browser, OS and device derived from a User-Agent string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Browser family.
    pub browser: String,
    /// Operating system family.
    pub os: String,
    /// `mobile`, `tablet` or `desktop`.
    pub device: String,
}

impl ClientInfo {
    /// Classify a User-Agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        Self {
            browser: browser(user_agent).to_string(),
            os: os(user_agent).to_string(),
            device: device(user_agent).to_string(),
        }
    }
}

// Order matters: Edge and Opera also advertise Chrome, Chrome also
// advertises Safari.
fn browser(ua: &str) -> &'static str {
    if ua.contains("Edg/") || ua.contains("Edge/") {
        "Edge"
    } else if ua.contains("OPR/") || ua.contains("Opera") {
        "Opera"
    } else if ua.contains("Firefox/") || ua.contains("FxiOS/") {
        "Firefox"
    } else if ua.contains("Chrome/") || ua.contains("CriOS/") {
        "Chrome"
    } else if ua.contains("Safari/") {
        "Safari"
    } else {
        "Unknown"
    }
}

fn os(ua: &str) -> &'static str {
    if ua.contains("Windows") {
        "Windows"
    } else if ua.contains("iPhone") || ua.contains("iPad") {
        "iOS"
    } else if ua.contains("Android") {
        "Android"
    } else if ua.contains("Mac OS X") || ua.contains("Macintosh") {
        "macOS"
    } else if ua.contains("Linux") {
        "Linux"
    } else {
        "Unknown"
    }
}

fn device(ua: &str) -> &'static str {
    if ua.contains("iPad") || (ua.contains("Android") && !ua.contains("Mobile")) {
        "tablet"
    } else if ua.contains("Mobi") || ua.contains("iPhone") {
        "mobile"
    } else {
        DEFAULT_DEVICE
    }
}
