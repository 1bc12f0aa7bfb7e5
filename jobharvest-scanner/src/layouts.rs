use crate::boards::{INDEED, JobBoard, LINKEDIN, NAUKRI};

/// CSS selectors describing one job board's search-result card markup
#[derive(Debug, Clone, Copy)]
pub struct SiteLayout {
    pub board: &'static JobBoard,
    /// Origin used to absolutize relative links when the page lives elsewhere
    pub origin: &'static str,
    /// Card containers, tried in order; the first that yields records wins
    pub cards: &'static [&'static str],
    pub title: &'static [&'static str],
    pub company: &'static [&'static str],
    pub location: &'static [&'static str],
    pub link: &'static [&'static str],
}

pub const SITE_LAYOUTS: &[SiteLayout] = &[
    SiteLayout {
        board: &INDEED,
        origin: "https://in.indeed.com",
        cards: &[
            "div.job_seen_beacon",
            "td.resultContent",
            "div.cardOutline",
            "div.slider_container",
        ],
        title: &[
            "h2.jobTitle span",
            "a[id^='job_'] span",
            ".jobTitle a span",
            "a.jcs-JobTitle span",
        ],
        company: &[
            "span[data-testid='company-name']",
            "span.companyName",
            ".company_location [data-testid='company-name']",
        ],
        location: &[
            "div[data-testid='text-location']",
            "div.companyLocation",
            ".company_location [data-testid='text-location']",
        ],
        link: &["a.jcs-JobTitle", "h2.jobTitle a"],
    },
    SiteLayout {
        board: &NAUKRI,
        origin: "https://www.naukri.com",
        cards: &["div.srp-jobtuple-wrapper", "article.jobTuple"],
        title: &["a.title"],
        company: &["a.comp-name", "a.subTitle"],
        location: &["span.locWdth", "li.location span"],
        link: &["a.title"],
    },
    SiteLayout {
        board: &LINKEDIN,
        origin: "https://www.linkedin.com",
        cards: &["div.base-search-card", "li.jobs-search-results__list-item"],
        title: &["h3.base-search-card__title", "a.job-card-list__title"],
        company: &["h4.base-search-card__subtitle", ".job-card-container__company-name"],
        location: &["span.job-search-card__location", ".job-card-container__metadata-item"],
        link: &["a.base-card__full-link", "a.job-card-list__title"],
    },
];
