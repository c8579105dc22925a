//! Defaults shared by the client and the server.

/// File name of the server list, placed in the user's home directory.
pub const STORE_FILE_NAME: &str = ".rocker-servers";

/// Environment variable overriding the server list location.
pub const STORE_PATH_ENV: &str = "ROCKER_SERVERS";

/// Timeout for requests issued by the remote client, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upper bound for a single identity lookup on the server, in seconds.
pub const LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Introspection endpoint returning the authenticated caller.
pub const ME_PATH: &str = "me";

/// Endpoint returning the server version.
pub const VERSION_PATH: &str = "version";

/// Endpoint listing the registered operations.
pub const OPERATIONS_PATH: &str = "operations";

/// Version reported by the built-in version operation.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve the default server list location, `<home>/.rocker-servers`.
pub fn default_store_path() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|home| home.join(STORE_FILE_NAME))
}
