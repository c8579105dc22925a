//! Command handling for the server registry.

use super::state::{Action, App, NewServer};
use crate::auth::Credentials;
use crate::client::RemoteClient;
use crate::error::{Result, RockerError};
use crate::store::{Profile, normalize_address};
use crate::ui::{self, Table};
use tracing::{debug, info};

/// Runs one [`Action`] against the app state.
pub struct Handler;

impl Handler {
    /// Dispatch an action.
    ///
    /// # Errors
    /// Returns error if the server list cannot be saved, the selected server
    /// is unknown or a remote call fails. The add wizard reports its own
    /// failures and only errors on broken console input.
    pub async fn handle(app: &App, action: Action) -> Result<()> {
        debug!("Handling {:?}", action);
        match action {
            Action::Check { server } => Self::handle_check(app, server.as_deref()).await,
            Action::Remove(name) => Self::handle_remove(app, &name),
            Action::List => {
                Self::handle_list(app);
                Ok(())
            }
            Action::SetDefault(name) => Self::handle_set_default(app, &name),
            Action::Add => Self::handle_add(app).await,
        }
    }

    /// Print version and operations of a remote server.
    async fn handle_check(app: &App, server: Option<&str>) -> Result<()> {
        let client = app.load_client(server)?;
        println!("Base URI: {}", client.base_uri());
        println!("Version: {}", client.server_version().await?);
        println!("Operations:");

        let mut table = Table::new(["Class", "Methods", "Path"]);
        for operation in client.list_operations().await? {
            table.add_row([
                operation.name,
                operation.methods.join(", "),
                operation.path,
            ]);
        }
        print!("{}", table);
        Ok(())
    }

    fn handle_remove(app: &App, name: &str) -> Result<()> {
        if app.store.remove(name)? {
            println!("Server removed (add flag -l to list servers)");
        } else {
            println!("Server \"{}\" is not stored", name);
        }
        Ok(())
    }

    fn handle_list(app: &App) {
        let mut table = Table::new(["Name", "Host", "Auth mechanism"]);
        for entry in app.store.list() {
            let name = if entry.is_default {
                format!("{} (default)", entry.profile.name)
            } else {
                entry.profile.name.clone()
            };
            table.add_row([
                name,
                entry.profile.address.clone(),
                entry.profile.auth_mechanism().to_string(),
            ]);
        }
        print!("{}", table);
    }

    /// Unknown names print the list instead of failing.
    fn handle_set_default(app: &App, name: &str) -> Result<()> {
        match app.store.set_default(name) {
            Ok(()) => {
                println!("Server \"{}\" set as default", name);
                Ok(())
            }
            Err(RockerError::UnknownProfile(_)) => {
                println!("Server does not exist....");
                Self::handle_list(app);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Interactive wizard adding a remote server.
    async fn handle_add(app: &App) -> Result<()> {
        println!("Add remote server");
        println!("--------------------");

        let server = NewServer {
            name: ui::prompt("Server name (any name of your choice)")?,
            address: ui::prompt("Server address")?,
            user: ui::prompt("Admin e-mail")?,
            password: ui::prompt_password("Admin password: ")?,
            secret: ui::prompt_allowing_empty("Secret (leave empty if not used)")?,
        };

        match Self::register_server(app, &server).await {
            Ok(version) => {
                println!(
                    "Successfully added server \"{}\" (v{})",
                    server.name, version
                );
                println!("... add flag -l to list all added servers");
            }
            Err(e) => {
                eprintln!("Failed adding server with message \"{}\"", e);
            }
        }
        Ok(())
    }

    /// Verify the credentials against the server and store it.
    ///
    /// Nothing is saved unless the server accepts the credentials.
    /// Returns the server version.
    pub async fn register_server(app: &App, server: &NewServer) -> Result<String> {
        let credentials = Credentials::new(server.user.clone(), server.password.clone());
        let auth = credentials.auth_header(Some(&server.secret))?;
        let profile = Profile {
            name: server.name.trim().to_string(),
            address: normalize_address(&server.address)?,
            auth: auth.build(),
        };

        let client = RemoteClient::with_timeout(&profile, app.timeout)?;
        let identity = client.check_identity().await?;
        debug!("Authenticated against {} as {}", profile.address, identity.id);
        let version = client.server_version().await?;

        app.store.add(&profile.name, &profile.address, &profile.auth)?;
        info!("Added server {} (v{})", profile.name, version);
        Ok(version)
    }
}
