// Domain layer - Records, coercion rules and settings

pub mod model;
pub mod rules;
pub mod settings;
