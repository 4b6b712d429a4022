//! Capacity probe - checks whether a constrained OCI compute shape can be launched

use capacity_probe::cli::Cli;
use capacity_probe::domain::error::{EXIT_FATAL, exit_code_for};
use capacity_probe::output::json;
use clap::Parser;
use clap::error::ErrorKind;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        // clap exits 2 on usage errors, which would read as "out of capacity".
        Err(e) => {
            let _ = e.print();
            std::process::exit(EXIT_FATAL);
        }
    };

    let json_mode = cli.json;
    let code = match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            let code = exit_code_for(&e);
            match json_mode.then(|| json::format_error(&format!("{e:#}"), code)) {
                Some(Ok(body)) => println!("{body}"),
                _ => eprintln!("Error: {e:#}"),
            }
            code
        }
    };
    std::process::exit(code);
}
