//! Scoreboard text matching.
//!
//! The game encodes per-line colour and style codes inline as literal `§x`
//! character pairs, so markers are compared verbatim: no case folding and no
//! stripping of formatting codes.

/// Returns `true` if `marker` is a substring of at least one scoreboard line.
///
/// An empty slice (no scoreboard displayed) never matches.
pub fn matches<S: AsRef<str>>(lines: &[S], marker: &str) -> bool {
    lines.iter().any(|line| line.as_ref().contains(marker))
}
