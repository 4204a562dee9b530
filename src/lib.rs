mod destroyable;
pub mod auth;
pub mod events;
pub mod game;
pub mod model;
pub mod scheduler;
pub mod storage;

pub use destroyable::Destroyable;
