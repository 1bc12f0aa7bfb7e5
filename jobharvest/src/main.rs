use jobharvest::commands::command_argument_builder;
use jobharvest::handlers::handle_extract;
use jobharvest_core::print_banner;
use tracing::Level;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("extract", primary_command)) => {
            if let Err(e) = handle_extract(primary_command, quiet).await {
                eprintln!("✗ {:#}", e);
                std::process::exit(1);
            }
        }
        // No subcommand provided, just show the banner
        None => {}
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
