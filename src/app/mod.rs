// Application layer - Wiring of collaborators into the dispatchers

pub mod container;

pub use container::{AppContainer, Backends, DefaultAppContainer};
