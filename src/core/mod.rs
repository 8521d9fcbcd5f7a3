pub mod clock;
pub mod ledger;
pub mod log;
pub mod overlay;
pub mod reconciler;
pub mod validator;
