mod link_handle_handler;
mod unlink_handle_handler;
mod update_reminder_settings_handler;


pub use link_handle_handler::LinkExternalHandleCommandHandler;
pub use unlink_handle_handler::UnlinkExternalHandleCommandHandler;
pub use update_reminder_settings_handler::UpdateReminderSettingsCommandHandler;
