use colored::Colorize;
use hubcheck::error::HubError;
use std::process::ExitCode;

fn main() -> ExitCode {
    match hubcheck::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(HubError::ValidationFailed(count)) => {
            eprintln!(
                "{} {} plugin check(s) failed",
                "hubcheck:".bright_red().bold(),
                count
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{} {}", "hubcheck error:".bright_red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
