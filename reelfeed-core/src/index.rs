//! Index arithmetic shared by every writer of the current feed index.
//!
//! Every index that enters the engine, whether from the keyboard, the item
//! renderer, or the visibility detector, passes through [`clamp_index`]. Out of
//! range values are silently pulled back into `[0, count - 1]`; an empty feed
//! clamps everything to `0`.

/// Bounds `candidate` into `[0, count - 1]`.
///
/// Returns `0` when `count` is zero so callers never have to special-case an
/// empty feed.
pub fn clamp_index(candidate: i64, count: usize) -> usize {
    if count == 0 || candidate <= 0 {
        return 0;
    }
    let last = i64::try_from(count - 1).unwrap_or(i64::MAX);
    candidate.min(last) as usize
}

/// A request for a new current index.
///
/// `Relative` targets are resolved against the *working* index at the moment
/// they are applied, which is what lets several rapid "next" presses compose
/// before any throttled publish happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Jump to this index (clamped).
    Absolute(i64),
    /// Move by this many items from the working index (clamped).
    Relative(i64),
}

impl Target {
    /// The item after the working index.
    pub const NEXT: Target = Target::Relative(1);
    /// The item before the working index.
    pub const PREVIOUS: Target = Target::Relative(-1);
    /// The working index itself, used to re-anchor scroll position.
    pub const CURRENT: Target = Target::Relative(0);

    /// Resolves this target against `base` and clamps it to `count` items.
    pub fn resolve(self, base: usize, count: usize) -> usize {
        let raw = match self {
            Target::Absolute(index) => index,
            Target::Relative(delta) => {
                i64::try_from(base).unwrap_or(i64::MAX).saturating_add(delta)
            }
        };
        clamp_index(raw, count)
    }
}

impl From<usize> for Target {
    fn from(index: usize) -> Self {
        Target::Absolute(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_range() {
        assert_eq!(clamp_index(-5, 10), 0);
        assert_eq!(clamp_index(50, 10), 9);
        assert_eq!(clamp_index(4, 10), 4);
    }

    #[test]
    fn empty_feed_clamps_to_zero() {
        assert_eq!(clamp_index(3, 0), 0);
        assert_eq!(Target::NEXT.resolve(0, 0), 0);
    }

    #[test]
    fn relative_targets_resolve_against_base() {
        assert_eq!(Target::NEXT.resolve(5, 20), 6);
        assert_eq!(Target::PREVIOUS.resolve(0, 20), 0);
        assert_eq!(Target::Relative(100).resolve(5, 20), 19);
        assert_eq!(Target::from(7).resolve(0, 20), 7);
    }
}
