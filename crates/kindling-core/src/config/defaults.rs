//! Default value functions for optional config fields.

use super::scoring::*;

pub(super) fn default_true() -> bool {
    true
}
pub(super) fn default_weight() -> f64 {
    1.0
}
pub(super) fn default_candidate_count() -> usize {
    20
}
pub(super) fn default_min_length() -> usize {
    200
}
pub(super) fn default_max_length() -> usize {
    350
}
pub(super) fn default_template_days() -> u32 {
    21
}
pub(super) fn default_topic_days() -> u32 {
    5
}
pub(super) fn default_tone_days() -> u32 {
    3
}
pub(super) fn default_constraint_days() -> u32 {
    10
}
pub(super) fn default_twist_days() -> u32 {
    10
}
pub(super) fn default_threshold() -> f64 {
    0.82
}
pub(super) fn default_history_size() -> usize {
    30
}
pub(super) fn default_empty_history_bonus() -> f64 {
    EMPTY_HISTORY_BONUS
}
pub(super) fn default_new_topic_bonus() -> f64 {
    NEW_TOPIC_BONUS
}
pub(super) fn default_new_format_bonus() -> f64 {
    NEW_FORMAT_BONUS
}
pub(super) fn default_new_tone_bonus() -> f64 {
    NEW_TONE_BONUS
}
pub(super) fn default_diversity_lookback() -> usize {
    DIVERSITY_LOOKBACK
}
pub(super) fn default_length_conformance() -> f64 {
    LENGTH_CONFORMANCE_SCORE
}
