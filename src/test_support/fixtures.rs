// Shared test fixtures. Compiled only under cfg(test).

pub mod app;
pub mod catalog;
pub mod commands;
pub mod events;
pub mod rows;
