//! Fallback classifier: ordered case-insensitive substring chains, used when
//! the profile tables are not available. First match wins in every chain.

use super::classifier::UaStrategy;
use super::model::{BrowserInfo, DeviceInfo, DeviceType, OsInfo, UaClassification};

pub(crate) struct HeuristicStrategy;

impl UaStrategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristics"
    }

    fn classify(&self, _ua: &str, ua_lc: &str) -> UaClassification {
        UaClassification {
            browser: browser_family(ua_lc),
            os: os_family(ua_lc),
            device: device_branch(ua_lc),
        }
    }
}

fn browser_family(ua_lc: &str) -> BrowserInfo {
    let family = if ua_lc.contains("edg/") || ua_lc.contains(" edge/") || ua_lc.contains(" edg ") {
        Some("Edge")
    } else if ua_lc.contains("opr/") || ua_lc.contains(" opera") {
        Some("Opera")
    } else if ua_lc.contains("chrome/") && !ua_lc.contains("edg") && !ua_lc.contains("opr") {
        Some("Chrome")
    } else if ua_lc.contains("firefox/") {
        Some("Firefox")
    } else if ua_lc.contains("safari/") && !ua_lc.contains("chrome") {
        Some("Safari")
    } else {
        None
    };

    BrowserInfo {
        family: family.map(str::to_string),
        version: None,
    }
}

fn os_family(ua_lc: &str) -> OsInfo {
    if ua_lc.contains("windows") {
        OsInfo {
            family: Some("Windows".to_string()),
            version: windows_version(ua_lc).map(str::to_string),
        }
    } else if ua_lc.contains("mac os x") || ua_lc.contains("macintosh") {
        OsInfo {
            family: Some("macOS".to_string()),
            version: version_after(ua_lc, "mac os x ", is_version_char)
                .map(|v| v.replace('_', ".")),
        }
    } else if ua_lc.contains("android") {
        OsInfo {
            family: Some("Android".to_string()),
            version: version_after(ua_lc, "android ", |c| c.is_ascii_digit() || c == '.'),
        }
    } else if ua_lc.contains("iphone")
        || ua_lc.contains("ipad")
        || ua_lc.contains("cpu iphone os")
        || ua_lc.contains("cpu os")
    {
        let version = version_after(ua_lc, "iphone os ", |c| c.is_ascii_digit() || c == '_')
            .or_else(|| version_after(ua_lc, "cpu os ", |c| c.is_ascii_digit() || c == '_'));
        OsInfo {
            family: Some("iOS".to_string()),
            version: version.map(|v| v.replace('_', ".")),
        }
    } else if ua_lc.contains("linux") {
        OsInfo {
            family: Some("Linux".to_string()),
            version: None,
        }
    } else {
        OsInfo::default()
    }
}

/// NT-version-to-name table. Windows 11 still reports NT 10.0, so the
/// explicit `windows 11` hint is the only distinguishing signal and most
/// real agents never send it.
fn windows_version(ua_lc: &str) -> Option<&'static str> {
    if ua_lc.contains("windows nt 6.1") {
        Some("7")
    } else if ua_lc.contains("windows nt 6.2") {
        Some("8")
    } else if ua_lc.contains("windows nt 6.3") {
        Some("8.1")
    } else if ua_lc.contains("windows nt 10.0") {
        if ua_lc.contains("windows 11") {
            Some("11")
        } else {
            Some("10")
        }
    } else {
        None
    }
}

/// Device branches, tested in order; each one sets every flag explicitly.
/// Tablet sits before Mobile so Android tablets carrying a `Mobile` token
/// do not get mislabeled.
fn device_branch(ua_lc: &str) -> DeviceInfo {
    if ["bot", "spider", "crawler"].iter().any(|m| ua_lc.contains(m)) {
        device(DeviceType::Bot, None)
    } else if ua_lc.contains("ipad") || ua_lc.contains("tablet") {
        device(
            DeviceType::Tablet,
            ua_lc.contains("ipad").then(|| "iPad".to_string()),
        )
    } else if ua_lc.contains("mobile") || ua_lc.contains("iphone") {
        device(
            DeviceType::Mobile,
            ua_lc.contains("iphone").then(|| "iPhone".to_string()),
        )
    } else if ua_lc.contains("windows") || ua_lc.contains("mac os x") || ua_lc.contains("linux") {
        device(DeviceType::Pc, None)
    } else {
        device(DeviceType::Other, None)
    }
}

fn device(kind: DeviceType, family: Option<String>) -> DeviceInfo {
    DeviceInfo {
        family,
        kind: Some(kind),
        is_mobile: Some(kind == DeviceType::Mobile),
        is_tablet: Some(kind == DeviceType::Tablet),
        is_pc: Some(kind == DeviceType::Pc),
        is_bot: Some(kind == DeviceType::Bot),
    }
}

fn is_version_char(c: char) -> bool {
    c.is_ascii_digit() || c == '_' || c == '.'
}

/// Run of `accept` characters directly after the first occurrence of
/// `marker`, `None` when empty.
fn version_after(ua_lc: &str, marker: &str, accept: fn(char) -> bool) -> Option<String> {
    let start = ua_lc.find(marker)? + marker.len();
    let tail = &ua_lc[start..];
    let end = tail.find(|c| !accept(c)).unwrap_or(tail.len());
    if end == 0 {
        None
    } else {
        Some(tail[..end].to_string())
    }
}
