mod clock;
mod detection_window;
mod energy_calculator;
mod hub_service;
mod rollover;
mod runtime_ledger;
mod sensor_history;
mod tariff;

pub use clock::*;
pub use detection_window::*;
pub use energy_calculator::*;
pub use hub_service::*;
pub use rollover::*;
pub use runtime_ledger::*;
pub use sensor_history::*;
pub use tariff::*;
