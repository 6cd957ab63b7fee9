use std::time::Duration;
use tokio::time::Instant;

use crate::scanner::WatchHandle;

/// Upper bound on how long a burst may postpone a rescan, in windows.
const MAX_WINDOWS: u32 = 10;

/// Absorb events until the handle has been quiet for `window`.
///
/// Returns how many extra events were folded into the pending rescan. A burst
/// that never goes quiet is cut off after `MAX_WINDOWS` windows so the index
/// cannot be starved by a continuously written file.
pub async fn settle(handle: &mut WatchHandle, window: Duration) -> usize {
    let deadline = Instant::now() + window * MAX_WINDOWS;
    let mut absorbed = 0;

    loop {
        let wait = window.min(deadline.saturating_duration_since(Instant::now()));
        if wait.is_zero() {
            return absorbed;
        }
        match tokio::time::timeout(wait, handle.next_event()).await {
            Ok(Some(_)) => absorbed += 1,
            Ok(None) | Err(_) => return absorbed,
        }
    }
}
