//! Application layer: the checkout state machine.
//!
//! `CheckoutController` takes an order from submit to terminal redirect,
//! calling the backend and the hosted widget through the domain ports.

pub mod controller;
