//! Translation bundle inputs: the bundle tree and the loaders that fetch it.

pub mod bundle;
pub mod source;
