mod access;
mod models;

pub use access::{AccessLevel, UserState};
pub use models::*;
