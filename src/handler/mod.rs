pub mod broadcast;

pub use broadcast::broadcast;
