pub mod ledger;
pub mod schedule;

#[cfg(test)]
mod ledger_proptest;

pub use ledger::*;
pub use schedule::*;
