//! Survey records and their descriptors.

mod answer;
mod question;
mod respondent;
mod survey;

pub use answer::Answer;
pub use question::Question;
pub use respondent::Respondent;
pub use survey::Survey;
