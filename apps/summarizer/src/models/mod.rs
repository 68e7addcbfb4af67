pub mod feedback;
pub mod summary;

pub use feedback::{FeedbackField, FeedbackRecord, PublishPayload};
pub use summary::{Summary, SummaryAnswers};
