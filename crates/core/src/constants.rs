/// Base currency for valuation and cost basis.
pub const BASE_CURRENCY: &str = "USD";

/// Secondary reporting currency.
pub const REPORTING_CURRENCY: &str = "VND";

/// Quantity threshold below which a balance is treated as zero.
pub const QUANTITY_THRESHOLD: &str = "0.00000001";

/// Link type recorded on deposit/withdrawal closure links.
pub const LINK_TYPE_STAKE_UNSTAKE: &str = "stake_unstake";
