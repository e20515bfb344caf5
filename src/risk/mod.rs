//! Risk sizing.
//!
//! - `lot_size.rs`: lots from balance, risk % and stop-loss pips, plus the
//!   0.5-step risk percentage stepper
//! - `position.rs`: units from entry/stop prices, with risk:reward rating
//!
//! Both are pure functions; nothing here performs I/O.

pub mod lot_size;
pub mod position;

pub use lot_size::{calculate, LotSize, RiskPercent, MIN_LOTS};
pub use position::{Direction, PositionPlan, PositionRequest, RewardRating, RiskError};
