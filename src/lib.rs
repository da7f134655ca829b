pub mod cli;
pub mod funcs;
pub mod render;
pub mod store;

pub use render::{Error, Renderer};
pub use store::{Client, KvPair, ParameterStore, StoreError};
