use super::command_handler::Command;
use crate::application::dtos::LinkResultDto;

// ============================================================
// Platform Handle Commands
// ============================================================

#[derive(Debug, Clone)]
pub struct LinkExternalHandleCommand {
    pub user_id: String,
    pub handle: String,
}

impl Command for LinkExternalHandleCommand {}

#[derive(Debug, Clone)]
pub struct UnlinkExternalHandleCommand {
    pub user_id: String,
}

impl Command for UnlinkExternalHandleCommand {}

pub type LinkExternalHandleResult = LinkResultDto;
pub type UnlinkExternalHandleResult = LinkResultDto;
