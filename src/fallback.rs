pub mod fixtures;
pub mod store;

pub use store::FallbackStore;
