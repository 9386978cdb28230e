//! Period reports derived on demand from the ledger. Reads are pure,
//! repeatable scans; nothing here mutates stored state.

pub mod cashflow;
pub mod holdings;
pub mod pnl;
pub mod spending;

pub use cashflow::{CashFlowReport, CashFlowService, FlowTotals, TypeFlow};
pub use holdings::{Holding, HoldingGroup, HoldingsBreakdown, HoldingsReport, HoldingsService};
pub use pnl::{PnlReport, PnlService};
pub use spending::{DaySpend, SpendingReport, SpendingService, TagSpend};
