// Domain data shared by every stage of the interview.

pub mod interview;
pub mod lenient;
pub mod profile;
pub mod scoring;

pub use interview::{AnswerRecord, SectionPlan};
pub use profile::Profile;
pub use scoring::RoleFitResult;
