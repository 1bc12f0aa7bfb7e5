use crate::boards::{board_for_url, source_tag};
use crate::error::{Result, ScanError};
use crate::fields::{lookup, scalar_text, string_list, FieldRule};
use crate::layouts::{SiteLayout, SITE_LAYOUTS};
use crate::record::{JobRecord, DEFAULT_COMPANY, DEFAULT_LOCATION, DEFAULT_SALARY};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

// JSON-LD JobPosting fields
const POSTING_TITLE: FieldRule = FieldRule::new(&[&["title"], &["name"]], "Unknown Title");
const POSTING_COMPANY: FieldRule = FieldRule::new(
    &[&["hiringOrganization", "name"], &["hiringOrganization"]],
    "Unknown Company",
);
const POSTING_LOCATION: FieldRule = FieldRule::new(
    &[&["jobLocation", "address", "addressLocality"], &["jobLocation", "address"]],
    DEFAULT_LOCATION,
);
const POSTING_EMPLOYMENT_TYPE: FieldRule = FieldRule::new(&[&["employmentType"]], "Full-time");
const POSTING_DESCRIPTION: FieldRule = FieldRule::new(&[&["description"]], "No description.");
const POSTING_URL: FieldRule = FieldRule::new(&[&["url"]], "");

// Auto-parsed JSON from a render service or a JSON endpoint
const JSON_TITLE: FieldRule =
    FieldRule::new(&[&["title"], &["job_title"], &["jobTitle"], &["name"]], "");
const JSON_COMPANY: FieldRule = FieldRule::new(
    &[
        &["company"],
        &["company_name"],
        &["companyName"],
        &["hiringOrganization", "name"],
        &["employer"],
    ],
    DEFAULT_COMPANY,
);
const JSON_LOCATION: FieldRule = FieldRule::new(
    &[
        &["location"],
        &["job_location"],
        &["jobLocation", "address", "addressLocality"],
    ],
    DEFAULT_LOCATION,
);
const JSON_SALARY: FieldRule =
    FieldRule::new(&[&["salary"], &["salary_range"], &["salaryRange"]], DEFAULT_SALARY);
const JSON_EMPLOYMENT_TYPE: FieldRule = FieldRule::new(
    &[&["employment_type"], &["employmentType"], &["job_type"], &["type"]],
    "Full-time",
);
const JSON_DESCRIPTION: FieldRule = FieldRule::new(
    &[&["description"], &["summary"], &["snippet"]],
    "Available on website.",
);
const JSON_LINK: FieldRule =
    FieldRule::new(&[&["url"], &["link"], &["external_link"], &["job_url"]], "");

/// Skill paired with the request keyword when a JSON source lists no skills
const COMPANION_SKILL: &str = "Adaptability";

/// Extracts job records from a page using the best heuristic that yields anything
#[derive(Debug, Clone, Default)]
pub struct PageParser {
    keyword: Option<String>,
}

impl PageParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyword used to seed `required_skills` for JSON sources without skills
    pub fn with_keyword(mut self, keyword: Option<String>) -> Self {
        self.keyword = keyword;
        self
    }

    /// Parse a page body. JSON bodies are normalized directly; HTML runs the
    /// structured-data, site-selector and page-metadata strategies in order and
    /// stops at the first one that produces a record.
    pub fn parse(&self, content: &str, content_type: Option<&str>, origin: &Url) -> Vec<JobRecord> {
        if is_json_content(content_type) {
            return match self.parse_json_payload(content, origin) {
                Ok(records) => records,
                Err(e) => {
                    warn!(url = %origin, error = %e, "Discarding unparseable JSON payload");
                    Vec::new()
                }
            };
        }

        let document = Html::parse_document(content);

        let records = Self::extract_structured(&document, origin);
        if !records.is_empty() {
            debug!(url = %origin, records = records.len(), "Structured data matched");
            return records;
        }

        let records = Self::extract_from_layouts(&document, origin);
        if !records.is_empty() {
            debug!(url = %origin, records = records.len(), "Site selectors matched");
            return records;
        }

        Self::extract_meta(&document, origin).into_iter().collect()
    }

    /// Normalize a JSON payload: a bare list, an object wrapping `results` or
    /// `jobs`, or a single job object
    pub fn parse_json_payload(&self, content: &str, origin: &Url) -> Result<Vec<JobRecord>> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| ScanError::ParseError(e.to_string()))?;

        let records = json_items(value)
            .iter()
            .filter_map(|item| self.json_record(item, origin))
            .collect();
        Ok(records)
    }

    fn json_record(&self, item: &Value, origin: &Url) -> Option<JobRecord> {
        let Some(title) = JSON_TITLE.find(item) else {
            debug!("Skipping JSON item without a title");
            return None;
        };

        let link = resolve_link(JSON_LINK.find(item).as_deref(), origin, origin);
        let mut record = JobRecord::new(title, link, source_tag(board_for_url(origin), "json"));
        record.company = JSON_COMPANY.resolve(item);
        record.location = JSON_LOCATION.resolve(item);
        record.salary_range = JSON_SALARY
            .find(item)
            .or_else(|| structured_salary(item))
            .unwrap_or_else(|| DEFAULT_SALARY.to_string());
        record.employment_type = JSON_EMPLOYMENT_TYPE.resolve(item);
        record.description = strip_html(&JSON_DESCRIPTION.resolve(item));

        let mut skills = string_list(item, &["skills"]);
        if skills.is_empty() {
            skills = string_list(item, &["required_skills"]);
        }
        if skills.is_empty() {
            let lead = self.keyword.clone().unwrap_or_else(|| "See Description".to_string());
            skills = vec![lead, COMPANION_SKILL.to_string()];
        }
        record.required_skills = skills;

        Some(record)
    }

    /// schema.org JobPosting objects from `application/ld+json` blocks
    fn extract_structured(document: &Html, origin: &Url) -> Vec<JobRecord> {
        let Some(selector) = parse_selector("script[type='application/ld+json']") else {
            return Vec::new();
        };

        let source = source_tag(board_for_url(origin), "structured");
        let mut records = Vec::new();

        for (idx, element) in document.select(&selector).enumerate() {
            let text = element.text().collect::<String>();
            let Some(value) = parse_ld_block(&text) else {
                debug!(url = %origin, block = idx, "Skipping malformed JSON-LD block");
                continue;
            };

            let mut postings = Vec::new();
            collect_postings(&value, &mut postings);
            records.extend(
                postings
                    .into_iter()
                    .map(|posting| posting_record(posting, origin, &source)),
            );
        }

        records
    }

    /// Known job-board card layouts
    fn extract_from_layouts(document: &Html, origin: &Url) -> Vec<JobRecord> {
        for layout in SITE_LAYOUTS {
            let records = Self::extract_layout(document, origin, layout);
            if !records.is_empty() {
                return records;
            }
        }
        Vec::new()
    }

    fn extract_layout(document: &Html, origin: &Url, layout: &SiteLayout) -> Vec<JobRecord> {
        let base = link_base(origin, layout);

        for pattern in layout.cards {
            let Some(card_selector) = parse_selector(pattern) else {
                continue;
            };

            let records: Vec<JobRecord> = document
                .select(&card_selector)
                .filter_map(|card| card_record(card, layout, origin, &base))
                .collect();

            if !records.is_empty() {
                return records;
            }
        }
        Vec::new()
    }

    /// One record from page-level Open Graph metadata
    fn extract_meta(document: &Html, origin: &Url) -> Option<JobRecord> {
        let title = meta_content(document, "og:title")?;

        let mut record = JobRecord::new(
            title,
            origin.to_string(),
            source_tag(board_for_url(origin), "meta"),
        );
        record.company =
            meta_content(document, "og:site_name").unwrap_or_else(|| "External Site".to_string());
        record.location = "See Link".to_string();
        record.description = meta_content(document, "og:description")
            .unwrap_or_else(|| "No description available.".to_string());
        record.required_skills = vec!["General".to_string()];
        record.requirements = "See job link for details.".to_string();
        Some(record)
    }
}

fn posting_record(posting: &Value, origin: &Url, source: &str) -> JobRecord {
    let link = resolve_link(POSTING_URL.find(posting).as_deref(), origin, origin);
    let mut record = JobRecord::new(POSTING_TITLE.resolve(posting), link, source);
    record.company = POSTING_COMPANY.resolve(posting);
    record.location = POSTING_LOCATION.resolve(posting);
    record.salary_range =
        structured_salary(posting).unwrap_or_else(|| DEFAULT_SALARY.to_string());
    record.employment_type = POSTING_EMPLOYMENT_TYPE.resolve(posting);
    record.description = strip_html(&POSTING_DESCRIPTION.resolve(posting));

    let skills = string_list(posting, &["skills"]);
    if !skills.is_empty() {
        record.required_skills = skills;
    }
    record
}

fn card_record(card: ElementRef, layout: &SiteLayout, origin: &Url, base: &Url) -> Option<JobRecord> {
    let title = first_text(card, layout.title)?;
    let href = first_attr(card, layout.link, "href");
    let link = resolve_link(href.as_deref(), base, origin);

    let mut record = JobRecord::new(title, link, source_tag(Some(layout.board), "selector"));
    record.company = first_text(card, layout.company).unwrap_or_else(|| DEFAULT_COMPANY.to_string());
    record.location =
        first_text(card, layout.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string());
    record.description = format!("See full details on {}.", layout.board.name);
    record.required_skills = vec!["Check Description".to_string()];
    record.requirements = "See listing.".to_string();
    Some(record)
}

/// Pages on the board itself keep their own (possibly regional) origin
fn link_base(origin: &Url, layout: &SiteLayout) -> Url {
    let on_board = origin
        .host_str()
        .is_some_and(|host| layout.board.matches_host(host));
    if on_board {
        return origin.clone();
    }
    Url::parse(layout.origin).unwrap_or_else(|_| origin.clone())
}

/// Absolute links pass through, relative ones join `base`, anything else falls back to `origin`
fn resolve_link(href: Option<&str>, base: &Url, origin: &Url) -> String {
    let Some(href) = href.map(str::trim).filter(|h| !h.is_empty()) else {
        return origin.to_string();
    };

    match Url::parse(href) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url.to_string(),
        Ok(_) => origin.to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| origin.to_string()),
        Err(_) => origin.to_string(),
    }
}

fn parse_selector(pattern: &str) -> Option<Selector> {
    match Selector::parse(pattern) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(selector = pattern, error = %e, "Skipping invalid selector");
            None
        }
    }
}

fn first_text(scope: ElementRef, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|pattern| {
        let selector = parse_selector(pattern)?;
        scope
            .select(&selector)
            .map(|element| clean_text(&element.text().collect::<Vec<_>>().join(" ")))
            .find(|text| !text.is_empty())
    })
}

fn first_attr(scope: ElementRef, selectors: &[&str], attr: &str) -> Option<String> {
    selectors.iter().find_map(|pattern| {
        let selector = parse_selector(pattern)?;
        scope
            .select(&selector)
            .find_map(|element| element.value().attr(attr).map(String::from))
    })
}

fn meta_content(document: &Html, property: &str) -> Option<String> {
    let selector = parse_selector(&format!(
        "meta[property='{property}'], meta[name='{property}']"
    ))?;
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .map(clean_text)
        .find(|content| !content.is_empty())
}

fn parse_ld_block(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok().or_else(|| {
        // Raw newlines inside string literals are common in hand-built blocks
        let flattened: String = text
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        serde_json::from_str(&flattened).ok()
    })
}

fn has_type(value: &Value, wanted: &str) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == wanted,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(wanted)),
        _ => false,
    }
}

fn collect_postings<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_postings(item, out)),
        Value::Object(_) if has_type(value, "JobPosting") => out.push(value),
        Value::Object(_) if has_type(value, "ListItem") => {
            if let Some(item) = value.get("item").filter(|item| has_type(item, "JobPosting")) {
                out.push(item);
            }
        }
        Value::Object(_) if has_type(value, "ItemList") => {
            if let Some(elements) = value.get("itemListElement") {
                collect_postings(elements, out);
            }
        }
        Value::Object(_) => {
            if let Some(graph) = value.get("@graph") {
                collect_postings(graph, out);
            }
        }
        _ => {}
    }
}

fn json_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in ["results", "jobs"] {
                if map.get(key).is_some_and(Value::is_array)
                    && let Some(Value::Array(items)) = map.remove(key)
                {
                    return items;
                }
            }
            vec![Value::Object(map)]
        }
        _ => Vec::new(),
    }
}

/// `baseSalary` as `"<min> - <max> <currency>"`
fn structured_salary(item: &Value) -> Option<String> {
    let base = lookup(item, &["baseSalary"])?;
    let value = base.get("value")?;

    let currency = lookup(value, &["currency"])
        .or_else(|| lookup(base, &["currency"]))
        .and_then(scalar_text)
        .unwrap_or_else(|| "USD".to_string());

    let min = value.get("minValue").and_then(scalar_text);
    let max = value.get("maxValue").and_then(scalar_text);
    if min.is_none() && max.is_none() {
        return scalar_text(value)
            .or_else(|| value.get("value").and_then(scalar_text))
            .map(|amount| format!("{amount} {currency}"));
    }

    Some(format!(
        "{} - {} {}",
        min.unwrap_or_default(),
        max.unwrap_or_default(),
        currency
    ))
}

fn is_json_content(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("json"))
}

/// Drop markup, keep the text
pub fn strip_html(raw: &str) -> String {
    if !raw.contains('<') && !raw.contains('&') {
        return clean_text(raw);
    }
    let fragment = Html::parse_fragment(raw);
    clean_text(&fragment.root_element().text().collect::<Vec<_>>().join(" "))
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
