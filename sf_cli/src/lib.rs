//! Cashier and player commands over the starfarer slot machine.

pub mod commands;
pub mod config;
pub mod logging;
