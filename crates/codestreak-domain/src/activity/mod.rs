mod source;
mod submission;

pub use source::{ActivitySource, PlatformProfile};
pub use submission::{accepted_count, solved_on, submissions_on, SubmissionRecord, ACCEPTED_STATUS};
