use serde::{Deserialize, Serialize};

use crate::parsing::ParsedResume;

/// Separator used for the skills column on disk.
pub const SKILL_SEPARATOR: char = ';';

/// One row of the flat-file store: a parsed résumé.
///
/// Field order is the column order of the CSV header. `skills_section` is never
/// written; it is picked up when a row happens to carry that extra column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateRecord {
    pub id: String,
    pub filename: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "skill_list")]
    pub skills: Vec<String>,
    pub education: String,
    pub experience: String,
    pub text: String,
    #[serde(skip_serializing)]
    pub skills_section: Option<String>,
}

impl CandidateRecord {
    /// Builds a record from parser output. Missing fields become empty strings.
    pub fn from_parsed(id: String, filename: String, parsed: ParsedResume) -> Self {
        Self {
            id,
            filename,
            name: parsed.name.unwrap_or_default(),
            email: parsed.email.unwrap_or_default(),
            phone: parsed.phone.unwrap_or_default(),
            skills: parsed.skills,
            education: parsed.education.unwrap_or_default(),
            experience: parsed.experience.unwrap_or_default(),
            text: parsed.text.unwrap_or_default(),
            skills_section: None,
        }
    }

    /// Display name, falling back to the uploaded filename.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.filename
        } else {
            &self.name
        }
    }
}

/// `Vec<String>` <-> `"a;b;c"`. An empty column reads back as no skills.
mod skill_list {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::SKILL_SEPARATOR;

    pub fn serialize<S: Serializer>(skills: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&skills.join(&SKILL_SEPARATOR.to_string()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let joined = String::deserialize(deserializer)?;
        Ok(split(&joined))
    }

    pub fn split(joined: &str) -> Vec<String> {
        if joined.is_empty() {
            return Vec::new();
        }
        joined.split(SKILL_SEPARATOR).map(String::from).collect()
    }
}
