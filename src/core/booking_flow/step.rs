use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    SelectService,
    SelectProfessional,
    SelectDate,
    SelectTime,
    SelectClientDetails,
    Confirm,
}

impl Step {
    /// Short label shown in the progress bar.
    pub fn label(&self) -> &'static str {
        match self {
            Step::SelectService => "Service",
            Step::SelectProfessional => "Professional",
            Step::SelectDate => "Date",
            Step::SelectTime => "Time",
            Step::SelectClientDetails => "Your details",
            Step::Confirm => "Confirm",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
