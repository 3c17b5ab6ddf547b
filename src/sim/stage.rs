//! Distance-keyed stage selection

use crate::tuning::StageDef;

/// Index of the last stage whose threshold is at or below `distance`.
///
/// `stages` must be sorted by ascending threshold. Returns `None` only when
/// the table is empty or the first threshold is above `distance`.
pub fn select_stage(distance: f32, stages: &[StageDef]) -> Option<usize> {
    stages.iter().rposition(|stage| stage.threshold <= distance)
}
