//! Embedded user-agent profile tables.
//!
//! This is the richer of the two engines: ordered marker tables for browser,
//! OS and device signals, with dotted-version extraction. It does not aim to
//! be complete — it aims to be fast and right for the popular agents, with
//! the flag-precedence and tablet-override rules applied on top.

use super::classifier::UaStrategy;
use super::model::{BrowserInfo, DeviceInfo, DeviceType, OsInfo, UaClassification};

/// `(marker, family)` pairs, most specific first. Edge and Opera ship a
/// `Chrome/` token too, so they must be tested before Chrome.
const BROWSER_MARKERS: &[(&str, &str)] = &[
    ("edg/", "Edge"),
    ("edge/", "Edge"),
    ("opr/", "Opera"),
    ("opera/", "Opera"),
    ("samsungbrowser/", "Samsung Internet"),
    ("fxios/", "Firefox"),
    ("firefox/", "Firefox"),
    ("crios/", "Chrome"),
    ("chrome/", "Chrome"),
];

const BOT_MARKERS: &[&str] = &[
    "bot",
    "spider",
    "crawler",
    "slurp",
    "facebookexternalhit",
    "bingpreview",
];

pub(crate) struct ProfileStrategy;

impl UaStrategy for ProfileStrategy {
    fn name(&self) -> &'static str {
        "profiles"
    }

    fn classify(&self, ua: &str, ua_lc: &str) -> UaClassification {
        let (family, flags) = device_profile(ua, ua_lc);
        let kind = DeviceType::from_flags(flags.mobile, flags.tablet, flags.pc, flags.bot);

        UaClassification {
            browser: browser_profile(ua_lc),
            os: os_profile(ua_lc),
            device: DeviceInfo {
                family,
                kind: Some(kind),
                is_mobile: Some(flags.mobile),
                is_tablet: Some(flags.tablet),
                is_pc: Some(flags.pc),
                is_bot: Some(flags.bot),
            },
        }
        .with_tablet_override(ua_lc)
    }
}

#[derive(Default)]
struct DeviceFlags {
    mobile: bool,
    tablet: bool,
    pc: bool,
    bot: bool,
}

impl DeviceFlags {
    fn only(kind: DeviceType) -> Self {
        Self {
            mobile: kind == DeviceType::Mobile,
            tablet: kind == DeviceType::Tablet,
            pc: kind == DeviceType::Pc,
            bot: kind == DeviceType::Bot,
        }
    }
}

fn browser_profile(ua_lc: &str) -> BrowserInfo {
    for (marker, family) in BROWSER_MARKERS {
        if ua_lc.contains(marker) {
            return BrowserInfo {
                family: Some((*family).to_string()),
                version: dotted_version_after(ua_lc, marker),
            };
        }
    }

    // Bare Safari advertises its real version behind `Version/`, the
    // `Safari/` token is the WebKit build number.
    if ua_lc.contains("safari/") {
        return BrowserInfo {
            family: Some("Safari".to_string()),
            version: dotted_version_after(ua_lc, "version/"),
        };
    }

    BrowserInfo::default()
}

fn os_profile(ua_lc: &str) -> OsInfo {
    if ua_lc.contains("windows") {
        return OsInfo {
            family: Some("Windows".to_string()),
            version: windows_nt_version(ua_lc).map(str::to_string),
        };
    }
    if ua_lc.contains("cros") {
        return OsInfo {
            family: Some("Chrome OS".to_string()),
            version: None,
        };
    }
    // iOS before macOS: every iPhone/iPad agent also says "like Mac OS X"
    if ua_lc.contains("iphone")
        || ua_lc.contains("ipad")
        || ua_lc.contains("ipod")
        || ua_lc.contains("cpu os")
    {
        let version = underscore_version_after(ua_lc, "iphone os ")
            .or_else(|| underscore_version_after(ua_lc, "cpu os "));
        return OsInfo {
            family: Some("iOS".to_string()),
            version,
        };
    }
    if ua_lc.contains("mac os x") || ua_lc.contains("macintosh") {
        return OsInfo {
            family: Some("macOS".to_string()),
            version: underscore_version_after(ua_lc, "mac os x "),
        };
    }
    if ua_lc.contains("android") {
        return OsInfo {
            family: Some("Android".to_string()),
            version: dotted_version_after(ua_lc, "android "),
        };
    }
    if ua_lc.contains("linux") || ua_lc.contains("x11") {
        return OsInfo {
            family: Some("Linux".to_string()),
            version: None,
        };
    }

    OsInfo::default()
}

fn windows_nt_version(ua_lc: &str) -> Option<&'static str> {
    if ua_lc.contains("windows nt 5.1") {
        Some("XP")
    } else if ua_lc.contains("windows nt 6.0") {
        Some("Vista")
    } else if ua_lc.contains("windows nt 6.1") {
        Some("7")
    } else if ua_lc.contains("windows nt 6.2") {
        Some("8")
    } else if ua_lc.contains("windows nt 6.3") {
        Some("8.1")
    } else if ua_lc.contains("windows nt 10.0") {
        // Windows 11 still reports NT 10.0; the literal hint is rare but decisive
        if ua_lc.contains("windows 11") {
            Some("11")
        } else {
            Some("10")
        }
    } else {
        None
    }
}

fn device_profile(ua: &str, ua_lc: &str) -> (Option<String>, DeviceFlags) {
    if BOT_MARKERS.iter().any(|m| ua_lc.contains(m)) {
        return (
            Some("Spider".to_string()),
            DeviceFlags::only(DeviceType::Bot),
        );
    }
    if ua_lc.contains("ipad") {
        return (
            Some("iPad".to_string()),
            DeviceFlags::only(DeviceType::Tablet),
        );
    }
    if ua_lc.contains("iphone") {
        return (
            Some("iPhone".to_string()),
            DeviceFlags::only(DeviceType::Mobile),
        );
    }
    if ua_lc.contains("ipod") {
        return (
            Some("iPod".to_string()),
            DeviceFlags::only(DeviceType::Mobile),
        );
    }
    if ua_lc.contains("android") {
        // Android tablets drop the "Mobile" token
        let kind = if ua_lc.contains("mobile") {
            DeviceType::Mobile
        } else {
            DeviceType::Tablet
        };
        return (samsung_model(ua, ua_lc), DeviceFlags::only(kind));
    }
    if ua_lc.contains("mobile") || ua_lc.contains("phone") {
        return (None, DeviceFlags::only(DeviceType::Mobile));
    }
    if ua_lc.contains("windows")
        || ua_lc.contains("mac os x")
        || ua_lc.contains("macintosh")
        || ua_lc.contains("linux")
        || ua_lc.contains("cros")
        || ua_lc.contains("x11")
    {
        let family = (ua_lc.contains("mac os x") || ua_lc.contains("macintosh"))
            .then(|| "Mac".to_string());
        return (family, DeviceFlags::only(DeviceType::Pc));
    }

    (None, DeviceFlags::default())
}

/// `Samsung SM-XXXX` device family from the model token, original casing.
fn samsung_model(ua: &str, ua_lc: &str) -> Option<String> {
    let start = ua_lc.find("sm-")?;
    let tail = &ua[start..];
    let end = tail
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(tail.len());
    if end <= 3 {
        return None;
    }
    Some(format!("Samsung {}", &tail[..end]))
}

/// Dotted numeric run right after `marker`, trailing dot trimmed.
fn dotted_version_after(ua_lc: &str, marker: &str) -> Option<String> {
    let start = ua_lc.find(marker)? + marker.len();
    let tail = &ua_lc[start..];
    let end = tail
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(tail.len());
    let version = tail[..end].trim_end_matches('.');
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

/// Version written with underscores (`10_15_7`), normalized to dots.
fn underscore_version_after(ua_lc: &str, marker: &str) -> Option<String> {
    let start = ua_lc.find(marker)? + marker.len();
    let tail = &ua_lc[start..];
    let end = tail
        .find(|c: char| !(c.is_ascii_digit() || c == '_' || c == '.'))
        .unwrap_or(tail.len());
    if end == 0 {
        return None;
    }
    Some(tail[..end].replace('_', "."))
}
