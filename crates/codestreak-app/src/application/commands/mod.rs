pub mod command_handler;
pub mod handlers;
pub mod link_commands;
pub mod reminder_commands;

pub use command_handler::{Command, CommandHandler};
