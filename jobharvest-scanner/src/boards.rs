use url::Url;

/// A job board we recognize by domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobBoard {
    pub name: &'static str,
    pub domain: &'static str,
}

pub const INDEED: JobBoard = JobBoard { name: "Indeed", domain: "indeed.com" };
pub const NAUKRI: JobBoard = JobBoard { name: "Naukri", domain: "naukri.com" };
pub const LINKEDIN: JobBoard = JobBoard { name: "LinkedIn", domain: "linkedin.com" };
pub const GLASSDOOR: JobBoard = JobBoard { name: "Glassdoor", domain: "glassdoor.com" };

pub const KNOWN_BOARDS: &[JobBoard] = &[INDEED, NAUKRI, LINKEDIN, GLASSDOOR];

/// Provenance label used when the page's host is not a known board
pub const EXTERNAL: &str = "External";

impl JobBoard {
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        host == self.domain || host.ends_with(&format!(".{}", self.domain))
    }
}

pub fn board_for_host(host: &str) -> Option<&'static JobBoard> {
    KNOWN_BOARDS.iter().find(|board| board.matches_host(host))
}

pub fn board_for_url(url: &Url) -> Option<&'static JobBoard> {
    url.host_str().and_then(board_for_host)
}

/// Build a provenance tag such as `Indeed (structured)` or `External (meta)`
pub fn source_tag(board: Option<&JobBoard>, method: &str) -> String {
    format!("{} ({})", board.map(|b| b.name).unwrap_or(EXTERNAL), method)
}
