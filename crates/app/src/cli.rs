//! Command line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pintalk_domain::HttpMethod;
use serde_json::Value;

/// Pintalk session client.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file; defaults to `pintalk.toml` when present.
    #[arg(long, env = "PINTALK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a request through the authenticated client.
    Request {
        /// GET, POST, PUT, PATCH or DELETE.
        method: HttpMethod,
        /// Path relative to the API base URL, e.g. `users/1/`.
        path: String,
        /// JSON request body.
        #[arg(long, value_parser = parse_json)]
        body: Option<Value>,
    },
    /// Store a session obtained from a successful login.
    Login {
        /// Session identifier returned by the login call.
        #[arg(long)]
        session_id: String,
        /// Access token returned by the login call.
        #[arg(long)]
        token: String,
    },
    /// Remove the stored session.
    Logout,
    /// Show the stored session.
    Status,
}

fn parse_json(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_with_body() {
        let cli = Cli::try_parse_from([
            "pintalk",
            "request",
            "patch",
            "users/1/",
            "--body",
            r#"{"profileName":"pin"}"#,
        ])
        .unwrap();

        match cli.command {
            Command::Request { method, path, body } => {
                assert_eq!(method, HttpMethod::Patch);
                assert_eq!(path, "users/1/");
                assert_eq!(body, Some(serde_json::json!({"profileName": "pin"})));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_request_rejects_bad_input() {
        assert!(Cli::try_parse_from(["pintalk", "request", "TRACE", "users/"]).is_err());
        assert!(
            Cli::try_parse_from(["pintalk", "request", "POST", "users/", "--body", "{oops"])
                .is_err()
        );
    }

    #[test]
    fn test_login_requires_both_values() {
        assert!(Cli::try_parse_from(["pintalk", "login", "--session-id", "42"]).is_err());

        let cli = Cli::try_parse_from([
            "pintalk",
            "login",
            "--session-id",
            "42",
            "--token",
            "tok",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Login { ref session_id, ref token } if session_id == "42" && token == "tok"
        ));
    }
}
