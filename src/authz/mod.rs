mod ability;
mod resolver;

pub use ability::{Abilities, AbilityGate, Action, DefaultPolicy, Subject};
pub use resolver::AccessResolver;
