pub mod survey_loader;

pub use survey_loader::{load_all_surveys, load_survey, parse_survey, QuestionEntry, SurveyFile};
