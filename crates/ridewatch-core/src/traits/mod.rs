//! Seams between the tracker and its collaborators.

pub mod position_store;

pub use position_store::PositionStore;
