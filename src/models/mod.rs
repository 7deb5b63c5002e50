pub mod submission;

pub use submission::SubmissionInput;
