//! `generate` subcommands

use clap::Subcommand;

use crate::config::Context;
use crate::error::OptikitResult;
use crate::scaffold::generate_module;

#[derive(Subcommand)]
pub enum GenerateCommands {
    /// Generate a module with bloc, event, state, screen, import and factory files
    Module {
        /// Module name (lowercase letters, numbers and underscores)
        name: String,
    },
}

pub fn handle_generate_command(ctx: &Context, cmd: GenerateCommands) -> OptikitResult<()> {
    match cmd {
        GenerateCommands::Module { name } => {
            generate_module(ctx.paths(), &name, ctx.dry_run())?;
        }
    }
    Ok(())
}
