pub mod commands;

// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    ExtractOptions, build_extract_options, load_urls_from_file, parse_url_line, resolve_api_key,
    run_extraction,
};
