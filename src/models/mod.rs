pub mod achievement;
pub mod generated_question;
pub mod lesson;
pub mod progress;
pub mod quiz_attempt;
pub mod quiz_question;
pub mod stats;
