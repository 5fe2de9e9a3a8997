// Domain layer: plan, recipe and shopping list models plus the ports the core talks through.

pub mod model;
pub mod ports;
pub mod recipe;
pub mod shopping;
