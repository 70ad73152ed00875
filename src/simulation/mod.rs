pub mod box_score;
pub mod extrapolator;
pub mod play_by_play;
