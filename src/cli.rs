//! Clap config
use clap::Parser;
use rocker::app::Action;
use rocker::config::{REQUEST_TIMEOUT_SECS, STORE_PATH_ENV};
use std::path::PathBuf;

/// rocker - manage connections to remote rocker servers.
///
/// Without flags an interactive wizard adds or edits a server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// List available servers
    #[arg(short = 'l')]
    pub list: bool,

    /// Remove a server (eg. rocker -r my-server)
    #[arg(short = 'r', value_name = "NAME")]
    pub remove: Option<String>,

    /// Set one of the added servers as default (eg. rocker -d my-server)
    #[arg(short = 'd', value_name = "NAME")]
    pub default: Option<String>,

    /// Check version and available operations on the remote server
    #[arg(short = 'c')]
    pub check: bool,

    /// Server to check instead of the default (only with -c)
    #[arg(short = 's', value_name = "NAME", requires = "check")]
    pub server: Option<String>,

    /// Server list location (default: ~/.rocker-servers)
    #[arg(long, env = STORE_PATH_ENV, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl Args {
    /// Pick the action, checking flags in the order -c, -r, -l, -d.
    pub fn action(&self) -> Action {
        if self.check {
            Action::Check {
                server: self.server.clone(),
            }
        } else if let Some(name) = &self.remove {
            Action::Remove(name.clone())
        } else if self.list {
            Action::List
        } else if let Some(name) = &self.default {
            Action::SetDefault(name.clone())
        } else {
            Action::Add
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("rocker").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_adds() {
        assert_eq!(parse(&[]).action(), Action::Add);
    }

    #[test]
    fn test_check_with_server() {
        assert_eq!(
            parse(&["-c", "-s", "stage"]).action(),
            Action::Check {
                server: Some("stage".to_string())
            }
        );
    }

    #[test]
    fn test_flags() {
        assert_eq!(parse(&["-l"]).action(), Action::List);
        assert_eq!(
            parse(&["-r", "prod"]).action(),
            Action::Remove("prod".to_string())
        );
        assert_eq!(
            parse(&["-d", "prod"]).action(),
            Action::SetDefault("prod".to_string())
        );
    }

    #[test]
    fn test_server_requires_check() {
        let result = Args::try_parse_from(["rocker", "-s", "stage"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_store_path() {
        let args = parse(&["--store", "/tmp/servers", "-l"]);
        assert_eq!(args.store, Some(PathBuf::from("/tmp/servers")));
    }
}
