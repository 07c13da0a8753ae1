use std::time::{SystemTime, UNIX_EPOCH};

/// The current unix timestamp, in seconds
pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is set before the unix epoch")
        .as_secs()
}
