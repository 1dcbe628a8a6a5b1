//! Commands run by the binary

pub mod reconcile;
