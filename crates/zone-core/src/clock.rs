use instant::Instant;
use std::time::Duration;

/// Time elapsed from `earlier` to `now`, zero if `now` is not later.
///
/// `instant::Instant` on wasm has no saturating variant, so compare first.
#[inline]
pub fn since(now: Instant, earlier: Instant) -> Duration {
    if now > earlier {
        now - earlier
    } else {
        Duration::ZERO
    }
}
