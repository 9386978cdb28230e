mod cashflow_model;
mod cashflow_service;


pub use cashflow_model::{CashFlowReport, FlowTotals, TypeFlow};
pub use cashflow_service::CashFlowService;
