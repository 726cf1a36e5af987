/// User-agent classification.
///
/// Two engines behind one seam, chosen once at startup and fixed for the
/// run: the embedded profile tables (feature `ua-profiles`, the default)
/// and the ordered heuristic fallback. Classification never fails; it
/// degrades to the all-absent shape.
pub mod classifier;
mod heuristic;
pub mod model;
#[cfg(feature = "ua-profiles")]
mod profiles;

pub use classifier::{Classifier, EnginePreference};
pub use model::{BrowserInfo, DeviceInfo, DeviceType, OsInfo, UaClassification};
