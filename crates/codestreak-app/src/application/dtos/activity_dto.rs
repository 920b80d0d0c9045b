use serde::{Deserialize, Serialize};

use codestreak_domain::activity::SubmissionRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckTodayDto {
    pub has_solved_today: bool,
    pub today_submissions: Vec<SubmissionRecord>,
    /// Accepted submissions among `today_submissions`
    pub count: usize,
}
