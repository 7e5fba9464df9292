mod enums;
mod equivalent;
mod fee;
mod savings;
mod volume;

pub use enums::{BaselineMode, Timeframe, TradingMode};
pub use equivalent::{Equivalent, EquivalentGoodItem};
pub use fee::{FeeTier, MakerRebateTier};
pub use savings::{SavingsResult, LIFETIME_MONTHS};
pub use volume::{VolumeBasis, DAYS_PER_MONTH};
