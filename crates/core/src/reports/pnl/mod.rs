mod pnl_model;
mod pnl_service;


pub use pnl_model::PnlReport;
pub use pnl_service::PnlService;
