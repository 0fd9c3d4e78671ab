pub mod loaders;
pub mod registry;
pub mod unit;

pub use loaders::{load_all_surveys, load_survey, QuestionEntry, SurveyFile};
pub use registry::Registry;
pub use unit::{AdvancePolicy, QuestionRef, Unit, UnitId, UnitSpec};
