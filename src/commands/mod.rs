//! CLI subcommands

pub mod contact;
pub mod list;
pub mod show;
