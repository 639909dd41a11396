//! Domain layer: checkout values, the state table and the ports the
//! controller drives.

pub mod order;
pub mod payment;
pub mod ports;
pub mod provider;
pub mod state;
