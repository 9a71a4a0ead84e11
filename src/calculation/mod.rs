//! Calculation logic for the contribution rewriter.
//!
//! This module contains the per-record rules: line classification and the
//! recomputation gate, schedule code resolution, subsidy period duration,
//! the pension and life-expectancy contribution formulas, and fixed-width
//! field replacement.

mod classification;
mod contribution;
mod field_writer;
mod schedule_resolution;
mod subsidy_period;

pub use classification::{
    ACTIVE_WORKER_TYPE, AFP_REGIME_CODE, MAIN_RECORD_INDICATOR, RecomputeDecision, RecordClass,
    SUBSIDY_MOVEMENT_CODES, classify_line, has_subsidy, recompute_contributions,
};
pub use contribution::{
    ContributionInputs, LIFE_EXPECTANCY_RATE, LifeExpectancyBasis, LifeExpectancyResult,
    PENSION_SURCHARGE_RATE, PRORATION_MONTH_DAYS, PensionContributionResult,
    calculate_life_expectancy_contribution, calculate_pension_contribution,
    calculate_proportional_base, round_amount, unemployment_base_field_value,
};
pub use field_writer::{FieldWrite, format_numeric, write_numeric_field};
pub use schedule_resolution::{ScheduleResolution, UnmappedWorker, resolve_schedule};
pub use subsidy_period::{
    MOVEMENT_DATE_FORMAT, SubsidyPeriod, SubsidyPeriodResult, calculate_subsidy_period,
    parse_movement_date,
};
