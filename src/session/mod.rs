pub mod builder;
pub mod ledger;
pub mod lifecycle;
pub mod quiz;
pub mod result;
