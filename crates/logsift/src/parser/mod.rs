/// Access-log line parsing.
///
/// - `combined.rs`: strict scanner for the nginx combined format
/// - `time.rs`: `$time_local` → ISO-8601 UTC normalization
/// - `model.rs`: record types and the per-line failure taxonomy
pub mod combined;
pub mod model;
pub mod time;

pub use model::{AccessRecord, FailedRecord, ParseFailure, ParsedRecord, RequestLine};
