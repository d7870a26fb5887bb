pub const DEFAULT_BASE_URL: &str = "https://westcentralus.api.cognitive.microsoft.com/face/v1.0/";

/// Worker threads spawned per batch.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Ceiling for each photo's analysis result. Long enough for large batches.
pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 60;

pub const DETECT_ATTRIBUTES: &[&str] = &["age", "gender"];

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

pub const ENV_API_KEY: &str = "SMILEY_API_KEY";
pub const ENV_BASE_URL: &str = "SMILEY_BASE_URL";
pub const ENV_POOL_SIZE: &str = "SMILEY_POOL_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "SMILEY_TIMEOUT_SECS";
