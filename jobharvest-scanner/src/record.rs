use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPANY: &str = "Unknown";
pub const DEFAULT_LOCATION: &str = "Remote";
pub const DEFAULT_SALARY: &str = "Competitive";
pub const DEFAULT_EMPLOYMENT_TYPE: &str = "Full-time";
pub const DEFAULT_REQUIREMENTS: &str = "See full description.";

/// Marker carried in `source` by every record that was not scraped from a real page
pub const SIMULATED_MARKER: &str = "Simulated";

/// The normalized output unit of every extraction tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary_range: String,
    pub employment_type: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub requirements: String,
    pub external_link: String,
    pub source: String,
}

impl JobRecord {
    /// Start a record with every optional field at its default
    pub fn new(title: impl Into<String>, external_link: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            company: DEFAULT_COMPANY.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            salary_range: DEFAULT_SALARY.to_string(),
            employment_type: DEFAULT_EMPLOYMENT_TYPE.to_string(),
            description: "No description available.".to_string(),
            required_skills: vec!["See Description".to_string()],
            requirements: DEFAULT_REQUIREMENTS.to_string(),
            external_link: external_link.into(),
            source: source.into(),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.source.contains(SIMULATED_MARKER)
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = JobRecord::new("Rust Engineer", "https://example.com/jobs/1", "External (meta)");
        assert_eq!(record.company, "Unknown");
        assert_eq!(record.location, "Remote");
        assert_eq!(record.salary_range, "Competitive");
        assert_eq!(record.employment_type, "Full-time");
        assert!(!record.is_synthetic());
    }

    #[test]
    fn test_synthetic_marker() {
        let record = JobRecord::new("Senior Rust Developer", "https://example.com", "Indeed (Simulated)");
        assert!(record.is_synthetic());
    }

    #[test]
    fn test_blank_title_is_not_a_title() {
        let record = JobRecord::new("   ", "https://example.com", "External (meta)");
        assert!(!record.has_title());
    }
}
