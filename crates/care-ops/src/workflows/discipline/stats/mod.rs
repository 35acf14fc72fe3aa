mod calculator;
mod levels;

pub use calculator::{
    compute_stats, partition, rolling_cutoff, Clock, DisciplineStats, DisciplineStatsCalculator,
    FixedClock, NegativePointsPolicy, RecordPartition, SystemClock, ROLLING_WINDOW_DAYS,
};
pub use levels::DisciplineLevel;
