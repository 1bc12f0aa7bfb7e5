use clap::{arg, command};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("jobharvest")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("jobharvest")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .arg(arg!(-v --"verbose" "Log at debug level").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("extract")
                .about(
                    "Extract job listings from one or more pages. Tries the remote render \
                service, then a local crawl, then falls back to simulated listings.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The page to extract listings from")
                        .value_parser(clap::value_parser!(Url))
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of page URLs")
                        .value_parser(clap::value_parser!(PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(--"api-key" <KEY>)
                        .required(false)
                        .help("Render service API key (default: $JOBHARVEST_RENDER_API_KEY)"),
                )
                .arg(
                    arg!(--"autoparse")
                        .required(false)
                        .help("Ask the render service for pre-parsed JSON")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"delay" <SECONDS>)
                        .required(false)
                        .help("Pause before each local crawl request")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("5"),
                )
                .arg(
                    arg!(--"remote-timeout" <SECONDS>)
                        .required(false)
                        .help("Time budget for the remote render tier")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("45"),
                )
                .arg(
                    arg!(--"crawl-timeout" <SECONDS>)
                        .required(false)
                        .help("Time budget for the local crawl tier")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("90"),
                )
                .arg(
                    arg!(--"capture-dir" <DIR>)
                        .required(false)
                        .help("Save every crawled page body under this directory")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--"max-records" <N>)
                        .required(false)
                        .help("Keep at most N scraped listings per page (N >= 1)")
                        .value_parser(clap::value_parser!(NonZeroUsize)),
                )
                .arg(
                    arg!(--"seed" <N>)
                        .required(false)
                        .help("Seed the simulated listings for reproducible output")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
}
