//! Registration form state machine
//!
//! The form is `Editing` until a submit passes validation, then
//! `Submitting` until the matching network outcome arrives. Only one
//! submission may be outstanding per form.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::constants::RESUME_EXTENSION;
use crate::error::{TransportError, ValidationError};
use crate::models::{Gender, Hobby, Registration, Resume, State};

/// Focusable form fields, in display order
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FormField {
    Name,
    Dob,
    Gender,
    Hobbies,
    State,
    Address,
    Resume,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Name,
        FormField::Dob,
        FormField::Gender,
        FormField::Hobbies,
        FormField::State,
        FormField::Address,
        FormField::Resume,
    ];

    pub fn next(&self) -> FormField {
        match self {
            FormField::Name => FormField::Dob,
            FormField::Dob => FormField::Gender,
            FormField::Gender => FormField::Hobbies,
            FormField::Hobbies => FormField::State,
            FormField::State => FormField::Address,
            FormField::Address => FormField::Resume,
            FormField::Resume => FormField::Name,
        }
    }

    pub fn prev(&self) -> FormField {
        match self {
            FormField::Name => FormField::Resume,
            FormField::Dob => FormField::Name,
            FormField::Gender => FormField::Dob,
            FormField::Hobbies => FormField::Gender,
            FormField::State => FormField::Hobbies,
            FormField::Address => FormField::State,
            FormField::Resume => FormField::Address,
        }
    }

    /// Whether the field is edited as free text
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::Name | FormField::Dob | FormField::Address | FormField::Resume
        )
    }
}

/// Submission lifecycle
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting { request_id: u64 },
}

/// Why a submit produced no request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("A registration is already being submitted.")]
    InFlight,
}

/// How a finished submission affected the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted by the server; the form was cleared
    Registered,
    /// Transport failure; the entered data is kept
    Failed,
}

/// In-memory registration record plus its submission phase
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub dob: String,
    pub gender: Option<Gender>,
    /// Selection order is preserved; it is the wire order
    pub hobbies: Vec<Hobby>,
    pub state: Option<State>,
    pub address: String,
    pub resume: Option<Resume>,
    /// Raw text of the file input
    pub resume_input: String,
    phase: FormPhase,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting { .. })
    }

    /// Text buffer backing a free-text field
    pub fn text(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Name => Some(&self.name),
            FormField::Dob => Some(&self.dob),
            FormField::Address => Some(&self.address),
            FormField::Resume => Some(&self.resume_input),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Dob => Some(&mut self.dob),
            FormField::Address => Some(&mut self.address),
            FormField::Resume => Some(&mut self.resume_input),
            _ => None,
        }
    }

    pub fn has_hobby(&self, hobby: Hobby) -> bool {
        self.hobbies.contains(&hobby)
    }

    /// Remove the hobby if selected, append it otherwise
    pub fn toggle_hobby(&mut self, hobby: Hobby) {
        if let Some(pos) = self.hobbies.iter().position(|h| *h == hobby) {
            self.hobbies.remove(pos);
        } else {
            self.hobbies.push(hobby);
        }
    }

    pub fn cycle_gender(&mut self, forward: bool) {
        self.gender = Some(if forward {
            Gender::next(self.gender)
        } else {
            Gender::prev(self.gender)
        });
    }

    pub fn cycle_state(&mut self, forward: bool) {
        self.state = Some(if forward {
            State::next(self.state)
        } else {
            State::prev(self.state)
        });
    }

    /// Commit the file input as the resume.
    ///
    /// On rejection the stored resume is untouched and the file input is
    /// cleared. An empty input is a no-op.
    pub fn select_resume(&mut self, input: &str) -> Result<(), ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(());
        }

        match check_resume(input) {
            Ok(resume) => {
                self.resume_input = resume.path.to_string_lossy().to_string();
                self.resume = Some(resume);
                Ok(())
            }
            Err(e) => {
                self.resume_input.clear();
                Err(e)
            }
        }
    }

    /// Commit whatever is in the file input
    pub fn commit_resume_input(&mut self) -> Result<(), ValidationError> {
        let input = self.resume_input.clone();
        self.select_resume(&input)
    }

    /// Check the record against the transmit invariant
    pub fn validate(&self, today: NaiveDate) -> Result<Registration, ValidationError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.dob.trim().is_empty() {
            missing.push("dob");
        }
        if self.gender.is_none() {
            missing.push("gender");
        }
        if self.resume.is_none() {
            missing.push("resume");
        }

        let (Some(gender), Some(resume)) = (self.gender, self.resume.clone()) else {
            return Err(ValidationError::MissingRequired { fields: missing });
        };
        if !missing.is_empty() {
            return Err(ValidationError::MissingRequired { fields: missing });
        }

        if self.hobbies.len() < 2 {
            return Err(ValidationError::TooFewHobbies { selected: self.hobbies.len() });
        }

        let dob = self.dob.trim();
        match NaiveDate::parse_from_str(dob, "%Y-%m-%d") {
            Ok(date) if date <= today => {}
            _ => {
                return Err(ValidationError::InvalidDateOfBirth { input: dob.to_string() });
            }
        }

        Ok(Registration {
            name: self.name.trim().to_string(),
            dob: dob.to_string(),
            gender,
            hobbies: self.hobbies.clone(),
            state: self.state,
            address: self.address.trim().to_string(),
            resume,
        })
    }

    /// Validate and enter `Submitting`; the returned record is what to send
    pub fn begin_submit(
        &mut self,
        request_id: u64,
        today: NaiveDate,
    ) -> Result<Registration, SubmitRejected> {
        if self.is_submitting() {
            return Err(SubmitRejected::InFlight);
        }
        let registration = self.validate(today)?;
        self.phase = FormPhase::Submitting { request_id };
        Ok(registration)
    }

    /// Apply the outcome of a submission. Returns `None` if `request_id` is
    /// not the outstanding submission.
    pub fn finish_submit(
        &mut self,
        request_id: u64,
        result: &Result<(), TransportError>,
    ) -> Option<SubmitOutcome> {
        if self.phase != (FormPhase::Submitting { request_id }) {
            return None;
        }
        match result {
            Ok(()) => {
                *self = RegistrationForm::new();
                Some(SubmitOutcome::Registered)
            }
            Err(_) => {
                self.phase = FormPhase::Editing;
                Some(SubmitOutcome::Failed)
            }
        }
    }

    /// Clear every field. Refused while a submission is outstanding.
    pub fn reset(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        *self = RegistrationForm::new();
        true
    }
}

fn check_resume(input: &str) -> Result<Resume, ValidationError> {
    let path = expand_home(input);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if !has_resume_extension(&file_name) {
        return Err(ValidationError::UnsupportedResumeType { file_name });
    }
    if !path.is_file() {
        return Err(ValidationError::ResumeNotFound { path });
    }
    Ok(Resume { path, file_name })
}

/// Extension after the last dot, compared case-insensitively
pub fn has_resume_extension(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.eq_ignore_ascii_case(RESUME_EXTENSION),
        None => false,
    }
}

pub(crate) fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches(['/', '\\']));
        }
    }
    Path::new(input).to_path_buf()
}
