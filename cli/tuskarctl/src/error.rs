//! Error handling and display for the CLI.

use colored::Colorize;
use thiserror::Error;

/// A known, user-facing command failure (bad input, missing configuration,
/// conflicts). Printed without a stack trace and without a failure exit code.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CommandError(pub String);

/// Build an `anyhow` error wrapping a [`CommandError`].
pub fn command_error(message: impl Into<String>) -> anyhow::Error {
    CommandError(message.into()).into()
}

/// Whether the error is a known command error.
pub fn is_command_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<CommandError>().is_some()
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    if is_command_error(err) {
        eprintln!("{err}");
        return;
    }

    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(api_err) = err.downcast_ref::<tuskar_api::Error>() {
        match api_err {
            tuskar_api::Error::Unauthorized => {
                eprintln!(
                    "\n{}",
                    "Hint: Check --os-auth-token or your username/password.".yellow()
                );
            }
            tuskar_api::Error::Network(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Check your network connection and the service endpoint.".yellow()
                );
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_errors_are_recognized_through_anyhow() {
        let err = command_error("You must provide username");
        assert!(is_command_error(&err));
        assert_eq!(err.to_string(), "You must provide username");

        let other = anyhow::anyhow!("boom");
        assert!(!is_command_error(&other));
    }
}
