//! examples of usage of RustedCalculus
/// chain rule, vectors, index identities and critical points
pub mod calculus_examples;
