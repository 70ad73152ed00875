pub mod manager;

pub use manager::{
    check_and_advance, create_bracket, reset_tournament, revert_game_result,
    update_series_result, AdvanceOutcome, ResetSummary, SeriesUpdate,
};
