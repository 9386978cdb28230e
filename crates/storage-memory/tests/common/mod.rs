use chrono::NaiveDate;
use moneta_core::accounts::{AccountKind, AccountRepositoryTrait, NewAccount};
use moneta_core::actions::ActionService;
use moneta_core::fx::{FxService, FxServiceTrait, NewExchangeRate};
use moneta_core::ledger::LedgerService;
use moneta_core::positions::PositionService;
use moneta_core::reports::{CashFlowService, HoldingsService, PnlService, SpendingService};
use moneta_storage_memory::{
    MemoryAccountRepository, MemoryFxRepository, MemoryLedgerRepository, MemoryPositionRepository,
    MemoryPriceOracle,
};
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Full stack wired over the in-memory stores, with the accounts and the
/// USD/VND rate every scenario needs.
pub struct Harness {
    pub oracle: Arc<MemoryPriceOracle>,
    pub fx_service: Arc<FxService>,
    pub ledger_service: Arc<LedgerService>,
    pub position_service: Arc<PositionService>,
    pub actions: ActionService,
    pub holdings: HoldingsService,
    pub cashflow: CashFlowService,
    pub pnl: PnlService,
    pub spending: SpendingService,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn harness() -> Harness {
    let ledger_repository = Arc::new(MemoryLedgerRepository::new());
    let position_repository = Arc::new(MemoryPositionRepository::new());
    let fx_repository = Arc::new(MemoryFxRepository::new());
    let account_repository = Arc::new(MemoryAccountRepository::new());
    let oracle = Arc::new(MemoryPriceOracle::new());

    let fx_service = Arc::new(FxService::new(fx_repository));
    let ledger_service = Arc::new(LedgerService::new(
        ledger_repository.clone(),
        account_repository.clone(),
        fx_service.clone(),
    ));
    let position_service = Arc::new(PositionService::new(
        position_repository,
        ledger_service.clone(),
        ledger_repository.clone(),
        oracle.clone(),
    ));

    let actions = ActionService::new(ledger_service.clone(), position_service.clone());
    let holdings = HoldingsService::new(ledger_repository.clone(), oracle.clone());
    let cashflow = CashFlowService::new(ledger_repository.clone(), fx_service.clone());
    let pnl = PnlService::new(position_service.clone(), oracle.clone(), fx_service.clone());
    let spending = SpendingService::new(ledger_repository.clone());

    for (id, kind) in [
        ("bank", AccountKind::Bank),
        ("binance", AccountKind::Exchange),
        ("cold-wallet", AccountKind::Wallet),
        ("visa", AccountKind::CreditCard),
    ] {
        account_repository
            .create_account(NewAccount {
                id: Some(id.to_string()),
                name: id.to_string(),
                kind,
                currency: None,
            })
            .await
            .unwrap();
    }

    fx_service
        .add_rate(NewExchangeRate {
            from_currency: "USD".to_string(),
            to_currency: "VND".to_string(),
            rate: dec!(25000),
            rate_date: date(2024, 1, 1),
            source: None,
        })
        .await
        .unwrap();

    Harness {
        oracle,
        fx_service,
        ledger_service,
        position_service,
        actions,
        holdings,
        cashflow,
        pnl,
        spending,
    }
}
