//! Application init

use crate::cli::Args;
use anyhow::Context;
use rocker::app::{App, Handler};
use rocker::store::CredentialStore;
use std::time::Duration;

/// Open the server list named on the command line or the per-user default.
fn open_store(args: &Args) -> anyhow::Result<CredentialStore> {
    match &args.store {
        Some(path) => Ok(CredentialStore::new(path)),
        None => CredentialStore::open_default().context("cannot locate the server list"),
    }
}

/// Start app.
pub async fn start(args: Args) -> anyhow::Result<()> {
    let store = open_store(&args)?;
    tracing::debug!("Using server list {}", store.path().display());

    let app = App::new(store, Duration::from_secs(args.timeout));
    Handler::handle(&app, args.action()).await?;
    Ok(())
}
