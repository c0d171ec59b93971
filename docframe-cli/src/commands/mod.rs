//! Subcommands of the `docframe` tool

pub mod inspect;
pub mod normalize;
pub mod split;
