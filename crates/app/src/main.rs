//! Pintalk command line client.
//!
//! Wires the reqwest transport, the file token store and the session
//! refresh pipeline, then runs one subcommand.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pintalk_application::{AuthenticatedClient, BeginSessionInput, ClientError, SessionManager};
use pintalk_domain::RequestSpec;
use pintalk_infrastructure::{
    ClientConfig, FileTokenStore, ReqwestHttpClient, TracingNavigator, init_tracing,
};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info")?;

    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref()).context("loading configuration")?;

    tracing::info!(
        base_url = %config.api_base_url,
        "Starting Pintalk client v{}",
        env!("CARGO_PKG_VERSION")
    );

    let bare = Arc::new(ReqwestHttpClient::new(&config)?);
    let store = Arc::new(FileTokenStore::new(&config.token_file));
    let client =
        AuthenticatedClient::with_session_refresh(bare, store.clone(), Arc::new(TracingNavigator));
    let sessions = SessionManager::new(store, Arc::clone(client.session()));

    match cli.command {
        Command::Request { method, path, body } => {
            let mut request = RequestSpec::new(method, path);
            if let Some(body) = body {
                request = request.with_json(&body)?;
            }
            send(&client, request).await?;
        }
        Command::Login { session_id, token } => {
            sessions
                .begin(BeginSessionInput {
                    session_id,
                    access_token: token,
                })
                .await?;
            println!("session stored");
        }
        Command::Logout => {
            sessions.end().await?;
            println!("session removed");
        }
        Command::Status => match sessions.current_token().await? {
            Some(token) => {
                let id = sessions.session_id().await?.unwrap_or_default();
                println!("logged in (session {id}, token {})", token.preview());
            }
            None => println!("not logged in"),
        },
    }

    Ok(())
}

async fn send(client: &AuthenticatedClient, request: RequestSpec) -> anyhow::Result<()> {
    match client.request(request).await {
        Ok(response) => {
            println!("{} {}", response.status, response.status_text);
            if !response.body.is_empty() {
                println!("{}", response.body);
            }
            Ok(())
        }
        Err(ClientError::Status(response)) => {
            eprintln!("{} {}", response.status, response.status_text);
            if !response.body.is_empty() {
                eprintln!("{}", response.body);
            }
            anyhow::bail!("request failed with status {}", response.status)
        }
        Err(ClientError::SessionTerminated { route }) => {
            anyhow::bail!("session expired; sign in again (redirected to {route})")
        }
        Err(e) => Err(e.into()),
    }
}
