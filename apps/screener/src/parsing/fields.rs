//! Heuristic field extraction from résumé text.
//!
//! Sections are found by heading lines ("Skills", "Work Experience", ...). A
//! section runs until the next recognised heading.

use std::sync::LazyLock;

use regex::Regex;

use super::ParsedResume;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\(?\d[\d \t().-]{6,}\d").expect("valid phone regex"));

static SKILL_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|•·●▪\n]").expect("valid skill split regex"));

/// Phone candidates outside this digit range are dates, years or ids.
const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 9..=15;
const NAME_SCAN_LINES: usize = 5;
const NAME_MAX_WORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Skills,
    Education,
    Experience,
    Other,
}

const HEADINGS: &[(&str, Section)] = &[
    ("skills", Section::Skills),
    ("technical skills", Section::Skills),
    ("core skills", Section::Skills),
    ("key skills", Section::Skills),
    ("skills & tools", Section::Skills),
    ("skills and tools", Section::Skills),
    ("competencies", Section::Skills),
    ("core competencies", Section::Skills),
    ("technologies", Section::Skills),
    ("education", Section::Education),
    ("education & training", Section::Education),
    ("academic background", Section::Education),
    ("qualifications", Section::Education),
    ("experience", Section::Experience),
    ("work experience", Section::Experience),
    ("professional experience", Section::Experience),
    ("employment history", Section::Experience),
    ("work history", Section::Experience),
    ("employment", Section::Experience),
    ("summary", Section::Other),
    ("profile", Section::Other),
    ("objective", Section::Other),
    ("about me", Section::Other),
    ("projects", Section::Other),
    ("certifications", Section::Other),
    ("awards", Section::Other),
    ("publications", Section::Other),
    ("languages", Section::Other),
    ("interests", Section::Other),
    ("references", Section::Other),
    ("volunteering", Section::Other),
    ("contact", Section::Other),
];

#[derive(Debug, Default)]
struct Sections {
    skills: Vec<String>,
    education: Vec<String>,
    experience: Vec<String>,
}

pub fn extract_fields(text: &str) -> ParsedResume {
    let sections = split_sections(text);

    ParsedResume {
        name: extract_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        skills: split_skills(&sections.skills.join("\n")),
        education: join_section(&sections.education),
        experience: join_section(&sections.experience),
        text: Some(text.to_string()),
    }
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|candidate| {
            let digits = candidate.chars().filter(char::is_ascii_digit).count();
            PHONE_DIGITS.contains(&digits)
        })
        .map(String::from)
}

pub fn extract_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(NAME_SCAN_LINES)
        .find(|line| {
            let words = line.split_whitespace().count();
            !line.contains('@')
                && !line.chars().any(|c| c.is_ascii_digit())
                && (1..=NAME_MAX_WORDS).contains(&words)
                && classify_heading(line).is_none()
        })
        .map(String::from)
}

/// Splits a skills blob into trimmed, de-duplicated entries (case-insensitive, first wins).
pub fn split_skills(blob: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    SKILL_SPLIT_RE
        .split(blob)
        .map(|s| s.trim().trim_start_matches(['-', '*']).trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(String::from)
        .collect()
}

/// Returns the section a heading line opens, plus any content after a `:`.
fn classify_heading(line: &str) -> Option<(Section, &str)> {
    let (head, rest) = match line.split_once(':') {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let head = head.trim().to_lowercase();
    HEADINGS
        .iter()
        .find(|(heading, _)| *heading == head)
        .map(|(_, section)| (*section, rest))
}

fn split_sections(text: &str) -> Sections {
    let mut sections = Sections::default();
    let mut current: Option<Section> = None;

    for line in text.lines().map(str::trim) {
        let body = match classify_heading(line) {
            Some((section, rest)) => {
                current = Some(section);
                rest
            }
            None => line,
        };
        if body.is_empty() {
            continue;
        }
        let target = match current {
            Some(Section::Skills) => &mut sections.skills,
            Some(Section::Education) => &mut sections.education,
            Some(Section::Experience) => &mut sections.experience,
            Some(Section::Other) | None => continue,
        };
        target.push(body.to_string());
    }

    sections
}

fn join_section(lines: &[String]) -> Option<String> {
    let joined = lines.join("\n");
    (!joined.trim().is_empty()).then_some(joined)
}
