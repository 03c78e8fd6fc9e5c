use crate::error::DashboardError;
use crate::models::session::InterviewType;
use crate::navigation::location::Location;
use crate::navigation::navigator::Navigator;

pub const CHAT_PATH: &str = "/chat";
pub const DURATION_OPTIONS: [u32; 4] = [15, 30, 45, 60];
pub const DEFAULT_DURATION: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Role,
    Company,
    InterviewType,
    Duration,
    Resume,
    JobDescription,
    AdditionalNotes,
}

impl DraftField {
    pub const ALL: [DraftField; 7] = [
        DraftField::Role,
        DraftField::Company,
        DraftField::InterviewType,
        DraftField::Duration,
        DraftField::Resume,
        DraftField::JobDescription,
        DraftField::AdditionalNotes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Role => "Role You're Applying For",
            DraftField::Company => "Company Name",
            DraftField::InterviewType => "Interview Type",
            DraftField::Duration => "Interview Duration (minutes)",
            DraftField::Resume => "Your Resume (paste as text)",
            DraftField::JobDescription => "Job Description (paste as text)",
            DraftField::AdditionalNotes => "Additional Notes (optional)",
        }
    }

    /// Query parameter name used in the handoff URL
    pub fn param(&self) -> &'static str {
        match self {
            DraftField::Role => "role",
            DraftField::Company => "company",
            DraftField::InterviewType => "interviewType",
            DraftField::Duration => "duration",
            DraftField::Resume => "resume",
            DraftField::JobDescription => "jobDescription",
            DraftField::AdditionalNotes => "additionalNotes",
        }
    }

    pub fn is_text(&self) -> bool {
        !matches!(self, DraftField::InterviewType | DraftField::Duration)
    }

    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let i = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewDraft {
    pub role: String,
    pub company: String,
    pub interview_type: Option<InterviewType>,
    pub duration: u32,
    pub resume: String,
    pub job_description: String,
    pub additional_notes: String,
}

impl Default for InterviewDraft {
    fn default() -> Self {
        Self {
            role: String::new(),
            company: String::new(),
            interview_type: None,
            duration: DEFAULT_DURATION,
            resume: String::new(),
            job_description: String::new(),
            additional_notes: String::new(),
        }
    }
}

impl InterviewDraft {
    pub fn text(&self, field: DraftField) -> Option<&str> {
        match field {
            DraftField::Role => Some(&self.role),
            DraftField::Company => Some(&self.company),
            DraftField::Resume => Some(&self.resume),
            DraftField::JobDescription => Some(&self.job_description),
            DraftField::AdditionalNotes => Some(&self.additional_notes),
            DraftField::InterviewType | DraftField::Duration => None,
        }
    }

    pub fn text_mut(&mut self, field: DraftField) -> Option<&mut String> {
        match field {
            DraftField::Role => Some(&mut self.role),
            DraftField::Company => Some(&mut self.company),
            DraftField::Resume => Some(&mut self.resume),
            DraftField::JobDescription => Some(&mut self.job_description),
            DraftField::AdditionalNotes => Some(&mut self.additional_notes),
            DraftField::InterviewType | DraftField::Duration => None,
        }
    }

    pub fn cycle_interview_type(&mut self) {
        self.interview_type = match self.interview_type {
            None => InterviewType::ALL.first().copied(),
            Some(current) => InterviewType::ALL
                .iter()
                .position(|t| *t == current)
                .and_then(|i| InterviewType::ALL.get(i + 1))
                .copied(),
        };
    }

    pub fn cycle_duration(&mut self) {
        self.duration = DURATION_OPTIONS
            .iter()
            .copied()
            .find(|d| *d > self.duration)
            .unwrap_or(DURATION_OPTIONS[0]);
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.role.is_empty() {
            missing.push(DraftField::Role.param());
        }
        if self.company.is_empty() {
            missing.push(DraftField::Company.param());
        }
        if self.interview_type.is_none() {
            missing.push(DraftField::InterviewType.param());
        }
        if self.resume.is_empty() {
            missing.push(DraftField::Resume.param());
        }
        if self.job_description.is_empty() {
            missing.push(DraftField::JobDescription.param());
        }
        missing
    }

    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// `/chat?role=..&company=..&interviewType=..&duration=..&resume=..&jobDescription=..&additionalNotes=..`
    pub fn launch_href(&self) -> Result<String, DashboardError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(DashboardError::Validation { missing });
        }

        let interview_type = self.interview_type.map(|t| t.label()).unwrap_or_default();
        let duration = self.duration.to_string();
        let location = Location::new(CHAT_PATH)
            .with_param(DraftField::Role.param(), &self.role)
            .with_param(DraftField::Company.param(), &self.company)
            .with_param(DraftField::InterviewType.param(), interview_type)
            .with_param(DraftField::Duration.param(), &duration)
            .with_param(DraftField::Resume.param(), &self.resume)
            .with_param(DraftField::JobDescription.param(), &self.job_description)
            .with_param(DraftField::AdditionalNotes.param(), &self.additional_notes);
        Ok(location.href())
    }

    /// Hands the draft to the interview engine. Nothing is navigated when the draft is
    /// incomplete; nothing is persisted either way.
    pub fn launch(&self, navigator: &dyn Navigator) -> Result<String, DashboardError> {
        let href = self.launch_href()?;
        log::info!(
            "Launching {} interview for {} at {}",
            self.interview_type.map(|t| t.label()).unwrap_or_default(),
            self.role,
            self.company
        );
        navigator.navigate(&href);
        Ok(href)
    }
}
