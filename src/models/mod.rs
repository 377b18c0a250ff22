pub mod rules;

pub use rules::{ChildPolicy, RuleSet};
