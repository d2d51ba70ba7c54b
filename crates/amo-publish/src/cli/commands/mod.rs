//! CLI commands

mod check;
mod inputs;
mod publish;

pub use check::CheckCommand;
pub use publish::PublishCommand;
