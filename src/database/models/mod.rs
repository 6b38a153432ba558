pub mod answer;
pub mod question;
pub mod session;
pub mod user;

pub use answer::Answer;
pub use question::Question;
pub use session::{CandidateRef, InterviewSession};
pub use user::{Role, User};
