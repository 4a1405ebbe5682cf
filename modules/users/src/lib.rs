// === PUBLIC CONTRACT ===
pub mod contract;

pub use contract::model::{NewUser, User};

// === MODULE WIRING ===
pub mod module;
pub use module::UsersModule;

// === INTERNAL MODULES ===
// Exposed for integration tests and the server binary; the contract above is the stable surface.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
