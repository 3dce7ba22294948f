//! Game implementations.

pub mod wordchain;
