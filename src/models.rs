use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::FALLBACK_RESUME_NAME;

/// Gender radio options
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Female, Gender::Male, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::Other => "Other",
        }
    }

    /// Cycle selection; `None` starts at the first option
    pub fn next(current: Option<Gender>) -> Gender {
        match current {
            None | Some(Gender::Other) => Gender::Female,
            Some(Gender::Female) => Gender::Male,
            Some(Gender::Male) => Gender::Other,
        }
    }

    pub fn prev(current: Option<Gender>) -> Gender {
        match current {
            None | Some(Gender::Female) => Gender::Other,
            Some(Gender::Male) => Gender::Female,
            Some(Gender::Other) => Gender::Male,
        }
    }
}

/// Hobby checkbox options
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hobby {
    Reading,
    Dancing,
    Skating,
    Cycling,
}

impl Hobby {
    pub const ALL: [Hobby; 4] = [Hobby::Reading, Hobby::Dancing, Hobby::Skating, Hobby::Cycling];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hobby::Reading => "Reading",
            Hobby::Dancing => "Dancing",
            Hobby::Skating => "Skating",
            Hobby::Cycling => "Cycling",
        }
    }
}

/// State dropdown options
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Maharashtra,
    Gujarat,
    UttarPradesh,
    MadhyaPradesh,
}

impl State {
    pub const ALL: [State; 4] = [
        State::Maharashtra,
        State::Gujarat,
        State::UttarPradesh,
        State::MadhyaPradesh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            State::Maharashtra => "Maharashtra",
            State::Gujarat => "Gujarat",
            State::UttarPradesh => "Uttar Pradesh",
            State::MadhyaPradesh => "Madhya Pradesh",
        }
    }

    pub fn next(current: Option<State>) -> State {
        match current {
            None | Some(State::MadhyaPradesh) => State::Maharashtra,
            Some(State::Maharashtra) => State::Gujarat,
            Some(State::Gujarat) => State::UttarPradesh,
            Some(State::UttarPradesh) => State::MadhyaPradesh,
        }
    }

    pub fn prev(current: Option<State>) -> State {
        match current {
            None | Some(State::Maharashtra) => State::MadhyaPradesh,
            Some(State::Gujarat) => State::Maharashtra,
            Some(State::UttarPradesh) => State::Gujarat,
            Some(State::MadhyaPradesh) => State::UttarPradesh,
        }
    }
}

/// A resume file accepted by the form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resume {
    pub path: PathBuf,
    pub file_name: String,
}

/// A validated record, ready to be sent as multipart form data
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub dob: String,
    pub gender: Gender,
    pub hobbies: Vec<Hobby>,
    pub state: Option<State>,
    pub address: String,
    pub resume: Resume,
}

impl Registration {
    /// Hobbies as sent on the wire: comma-joined, in selection order
    pub fn hobbies_field(&self) -> String {
        self.hobbies
            .iter()
            .map(Hobby::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Text parts of the multipart body, in wire order
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("dob", self.dob.clone()),
            ("gender", self.gender.as_str().to_string()),
            ("hobbies", self.hobbies_field()),
            ("state", self.state.map(|s| s.as_str()).unwrap_or_default().to_string()),
            ("address", self.address.clone()),
        ]
    }
}

/// A registered user as returned by the listing endpoint
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub dob: String,
    pub gender: String,
    #[serde(deserialize_with = "hobbies_from_any")]
    pub hobbies: String,
    pub state: String,
    pub address: String,
    #[serde(rename = "resumePath")]
    pub resume_path: String,
}

impl UserRecord {
    /// File name for a downloaded resume: last segment of the stored path.
    /// Anything other than a plain file name (`.`, `..`, empty) falls back.
    pub fn resume_file_name(&self) -> String {
        self.resume_path
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| is_plain_file_name(s))
            .unwrap_or(FALLBACK_RESUME_NAME)
            .to_string()
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Accepts hobbies either as the comma-joined string we send or as an array
fn hobbies_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Hobbies {
        Joined(String),
        List(Vec<String>),
        Missing(()),
    }

    Ok(match Hobbies::deserialize(deserializer)? {
        Hobbies::Joined(s) => s,
        Hobbies::List(items) => items.join(","),
        Hobbies::Missing(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_from_server_json() {
        let json = r#"[
            {"_id":"a1","name":"Ana","dob":"2000-01-01","gender":"Female",
             "hobbies":"Reading,Cycling","state":"Gujarat","address":"Somewhere",
             "resumePath":"uploads/ana.docx"},
            {"_id":"b2","name":"Raj","hobbies":["Dancing","Skating"],"resumePath":""}
        ]"#;
        let users: Vec<UserRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "a1");
        assert_eq!(users[0].resume_path, "uploads/ana.docx");
        assert_eq!(users[1].hobbies, "Dancing,Skating");
        assert_eq!(users[1].dob, "");
    }

    #[test]
    fn test_null_hobbies_decode_as_empty() {
        let user: UserRecord = serde_json::from_str(r#"{"_id":"x","hobbies":null}"#).unwrap();
        assert_eq!(user.hobbies, "");
    }

    #[test]
    fn test_resume_file_name() {
        let mut user = UserRecord { resume_path: "uploads/ana.docx".into(), ..Default::default() };
        assert_eq!(user.resume_file_name(), "ana.docx");

        user.resume_path = "uploads\\win.docx".into();
        assert_eq!(user.resume_file_name(), "win.docx");

        user.resume_path = "uploads/".into();
        assert_eq!(user.resume_file_name(), FALLBACK_RESUME_NAME);
    }

    #[test]
    fn test_resume_file_name_rejects_dot_segments() {
        for path in ["uploads/..", "uploads/.", "..", "."] {
            let user = UserRecord { resume_path: path.into(), ..Default::default() };
            assert_eq!(user.resume_file_name(), FALLBACK_RESUME_NAME, "path {:?}", path);
        }
    }

    #[test]
    fn test_enum_cycles_wrap() {
        assert_eq!(Gender::next(None), Gender::Female);
        assert_eq!(Gender::next(Some(Gender::Other)), Gender::Female);
        assert_eq!(Gender::prev(Some(Gender::Female)), Gender::Other);
        assert_eq!(State::next(Some(State::MadhyaPradesh)), State::Maharashtra);
        assert_eq!(State::prev(None), State::MadhyaPradesh);
        assert_eq!(State::UttarPradesh.as_str(), "Uttar Pradesh");
    }
}
