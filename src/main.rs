//! pr-review: AI-assisted pull request descriptions and code reviews
//!
//! Fetches a pull request from GitHub, sizes the diff for the model's
//! context window and prints a scored review or a generated description.

use std::process::ExitCode;

use pr_review::error::ReviewError;

fn main() -> ExitCode {
    match pr_review::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ReviewError>() {
                Some(review_err) => eprintln!("{}: {review_err}", review_err.kind()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
