use box_matrix::cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The exit status is the number of failed runs
    match cli::run().await {
        Ok(errors) => ExitCode::from(errors),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
