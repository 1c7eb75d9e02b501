use chattest::{commands::run_app, ux};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match run_app().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ux::present_error(err);
            ExitCode::FAILURE
        }
    }
}
