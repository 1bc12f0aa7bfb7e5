pub mod error;
pub mod orchestrator;
pub mod report;
pub mod request;
pub mod synthetic;

pub use error::ExtractionError;
pub use orchestrator::{ExtractionOrchestrator, ExtractionResult, OrchestratorConfig};
pub use request::{ExtractionRequest, extract_keyword};
pub use synthetic::SyntheticFallbackGenerator;

use colored::Colorize;

pub fn print_banner() {
    println!();
    println!("  {}", "JOBHARVEST".bright_cyan().bold());
    println!(
        "  {} {}\n",
        "cascading job-listing extractor".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
