pub mod boards;
pub mod crawler;
pub mod error;
pub mod extractor;
pub mod fields;
pub mod layouts;
pub mod parser;
pub mod record;
pub mod remote;
pub mod result;

pub use crawler::{CrawlConfig, LocalCrawlStrategy};
pub use error::ScanError;
pub use extractor::{Extractor, Tier};
pub use parser::PageParser;
pub use record::JobRecord;
pub use remote::{RemoteRenderConfig, RemoteRenderStrategy};
pub use result::FetchedPage;
