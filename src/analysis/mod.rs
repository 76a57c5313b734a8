/// Analysis over stored DRI readings.
///
/// Submodules:
/// - `history` — history windows, per-river grouping and summaries.

pub mod history;
