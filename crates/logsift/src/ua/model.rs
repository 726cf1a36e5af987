use std::fmt;

use serde::{Serialize, Serializer};

/// Mutually exclusive device category of the requesting client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Mobile,
    Tablet,
    Pc,
    Bot,
    Other,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "Mobile",
            DeviceType::Tablet => "Tablet",
            DeviceType::Pc => "PC",
            DeviceType::Bot => "Bot",
            DeviceType::Other => "Other",
        }
    }

    /// Derive the category from the four flags. First true flag wins:
    /// mobile > tablet > pc > bot, `Other` when none are set.
    pub fn from_flags(is_mobile: bool, is_tablet: bool, is_pc: bool, is_bot: bool) -> Self {
        if is_mobile {
            DeviceType::Mobile
        } else if is_tablet {
            DeviceType::Tablet
        } else if is_pc {
            DeviceType::Pc
        } else if is_bot {
            DeviceType::Bot
        } else {
            DeviceType::Other
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for DeviceType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrowserInfo {
    pub family: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OsInfo {
    pub family: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub family: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<DeviceType>,
    pub is_mobile: Option<bool>,
    pub is_tablet: Option<bool>,
    pub is_pc: Option<bool>,
    pub is_bot: Option<bool>,
}

/// Result of classifying one user-agent string. Built in one step per
/// classification call and never mutated afterwards; the tablet override
/// below is the only sanctioned adjustment and produces a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UaClassification {
    pub browser: BrowserInfo,
    pub os: OsInfo,
    pub device: DeviceInfo,
}

impl UaClassification {
    /// The all-absent shape used for empty or unrecognized user agents.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Force `Tablet` when the raw string carries an explicit tablet hint
    /// (`tablet`, `ipad`, or a Samsung tablet model marker). Many tablet
    /// user agents also advertise `Mobile` and would otherwise lose the
    /// flag-precedence race. Competing flags are cleared so the category
    /// stays mutually exclusive.
    pub fn with_tablet_override(mut self, ua_lc: &str) -> Self {
        let looks_like_tablet =
            ua_lc.contains("tablet") || ua_lc.contains("ipad") || ua_lc.contains("sm-t");
        if looks_like_tablet {
            self.device.kind = Some(DeviceType::Tablet);
            self.device.is_tablet = Some(true);
            self.device.is_mobile = Some(false);
            self.device.is_pc = Some(false);
            self.device.is_bot = Some(false);
            if ua_lc.contains("ipad") {
                self.device.family = Some("iPad".to_string());
            }
        }
        self
    }
}
