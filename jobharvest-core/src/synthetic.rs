//! Last-resort listings for when no real tier produced anything.
//!
//! Output is random unless the generator is seeded, and every record is tagged
//! `<Board> (Simulated)` so consumers can tell it apart from scraped data.

use jobharvest_scanner::JobRecord;
use jobharvest_scanner::boards::{JobBoard, KNOWN_BOARDS, board_for_url};
use jobharvest_scanner::record::SIMULATED_MARKER;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use url::Url;

pub const RECORD_COUNT: RangeInclusive<usize> = 10..=15;

const DEFAULT_ROLE: &str = "Software Engineer";

const SENIORITY: &[&str] = &["Junior", "Associate", "Senior", "Lead", "Staff", "Principal"];

const ROLE_TYPES: &[&str] = &[
    "Developer",
    "Engineer",
    "Analyst",
    "Specialist",
    "Consultant",
    "Architect",
    "Scientist",
    "Designer",
    "Manager",
];

const COMPANIES: &[&str] = &[
    "TechCorp",
    "DataSystems",
    "CreativeStudio",
    "InnovateX",
    "CloudScale",
    "FutureNet",
    "SoftSolutions",
    "WebWizards",
    "AppMasters",
    "AI Frontiers",
];

const LOCATIONS: &[&str] = &[
    "Remote",
    "New York, NY",
    "San Francisco, CA",
    "Austin, TX",
    "Seattle, WA",
    "Bangalore, KA",
    "Mumbai, MH",
    "Delhi, NCR",
    "Hyderabad, TS",
    "Pune, MH",
];

/// Salary bands in thousands
const SALARY_BANDS: &[(u32, u32)] = &[(60, 90), (80, 120), (100, 140), (120, 170), (150, 210)];

const SKILLS_MAP: &[(&str, &[&str])] = &[
    ("frontend", &["React", "TypeScript", "Tailwind CSS", "Next.js", "Redux"]),
    ("react", &["React", "TypeScript", "Redux"]),
    ("backend", &["Node.js", "Python", "PostgreSQL", "Redis", "Docker", "AWS"]),
    ("python", &["Python", "Django", "PostgreSQL"]),
    ("design", &["Figma", "UI/UX", "Adobe XD", "Prototyping", "User Research"]),
    ("marketing", &["SEO", "Content Marketing", "Google Analytics", "Social Media"]),
    ("data", &["Python", "SQL", "Pandas", "Machine Learning", "Tableau"]),
];

#[derive(Debug, Clone, Default)]
pub struct SyntheticFallbackGenerator {
    seed: Option<u64>,
}

impl SyntheticFallbackGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call to `generate` replays the same sequence
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn generate(&self, keyword: Option<&str>, source_url: &Url) -> Vec<JobRecord> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::generate_with(&mut rng, keyword, source_url)
    }

    /// Generate from a caller-supplied random source
    pub fn generate_with<R: Rng + ?Sized>(
        rng: &mut R,
        keyword: Option<&str>,
        source_url: &Url,
    ) -> Vec<JobRecord> {
        let stem = keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(DEFAULT_ROLE);

        let board = board_for_url(source_url)
            .copied()
            .unwrap_or_else(|| *pick(rng, KNOWN_BOARDS));
        let source = format!("{} ({})", board.name, SIMULATED_MARKER);
        let skills = skills_for(stem);

        let count = rng.random_range(RECORD_COUNT);
        (0..count)
            .map(|_| {
                let title = role_title(stem, *pick(rng, SENIORITY), *pick(rng, ROLE_TYPES));
                let mut record = JobRecord::new(title, source_url.to_string(), source.clone());
                record.company = pick(rng, COMPANIES).to_string();
                record.location = pick(rng, LOCATIONS).to_string();
                let (low, high) = *pick(rng, SALARY_BANDS);
                record.salary_range = format!("${low}k - ${high}k");
                record.description = description(&board);
                record.required_skills = skills.clone();
                record.requirements = "Proven experience required.".to_string();
                record
            })
            .collect()
    }
}

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, pool: &'a [T]) -> &'a T {
    &pool[rng.random_range(0..pool.len())]
}

/// Prefix the keyword with a seniority, adding a role word only when it lacks one
pub fn role_title(keyword: &str, seniority: &str, role_type: &str) -> String {
    let has_role = keyword.split_whitespace().any(|word| {
        ROLE_TYPES
            .iter()
            .any(|role| role.eq_ignore_ascii_case(word))
    });

    if has_role {
        format!("{seniority} {keyword}")
    } else {
        format!("{seniority} {keyword} {role_type}")
    }
}

fn skills_for(stem: &str) -> Vec<String> {
    let lowered = stem.to_lowercase();
    SKILLS_MAP
        .iter()
        .find(|(key, _)| lowered.contains(key))
        .map(|(_, skills)| skills.iter().take(3).map(|s| s.to_string()).collect())
        .unwrap_or_else(|| vec!["General Skills".to_string()])
}

fn description(board: &JobBoard) -> String {
    format!(
        "({} from {}) We are looking for talented individuals. This listing is a placeholder \
         because no real listings could be extracted from the source page.",
        SIMULATED_MARKER, board.name
    )
}
