//! # Repository Workflows
//!
//! Multi-step operations built on [`Repository`]. Most of them accept either
//! a repository name or a proxy the caller already holds ([`RepoRef`]), so a
//! command that has read the repository once does not have to read it again.

use log::{debug, info};
use serde_json::{json, Map, Value};

use crate::connection::Connection;
use crate::defaults::{DEFAULT_STARTING_FOLDER, DEFAULT_VSID};
use crate::error::{Error, Result};
use crate::gcts::configuration::{ConfigMap, CLIENT_VCS_AUTH_TOKEN, VCS_TARGET_DIR};
use crate::gcts::errors::{ErrorClassifier, GctsError};
use crate::gcts::repository::{Commit, CommitTransition, RepoType, Repository, Role};

/// A repository given by name or as an existing proxy
pub enum RepoRef<'r, 'c> {
    Name(&'r str),
    Repository(&'r mut Repository<'c>),
}

impl<'r> From<&'r str> for RepoRef<'r, '_> {
    fn from(name: &'r str) -> Self {
        RepoRef::Name(name)
    }
}

impl<'r, 'c> From<&'r mut Repository<'c>> for RepoRef<'r, 'c> {
    fn from(repo: &'r mut Repository<'c>) -> Self {
        RepoRef::Repository(repo)
    }
}

fn with_repository<'c, T>(
    connection: &'c dyn Connection,
    target: RepoRef<'_, 'c>,
    operation: impl FnOnce(&mut Repository<'c>) -> Result<T>,
) -> Result<T> {
    match target {
        RepoRef::Name(name) => operation(&mut Repository::new(connection, name)),
        RepoRef::Repository(repo) => operation(repo),
    }
}

/// Returns proxies for all repositories of the system.
///
/// The proxies are filled from the list response and do not fetch again.
pub fn list_all(connection: &dyn Connection) -> Result<Vec<Repository<'_>>> {
    let response = connection
        .get_json("repository")
        .map_err(|err| ErrorClassifier::default().translate(err))?;

    let items = match response.get("result") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(Error::invalid_response("the repository list is not a list")),
    };

    items
        .iter()
        .map(|item| {
            let data: Map<String, Value> = item
                .as_object()
                .cloned()
                .ok_or_else(|| Error::invalid_response("a repository list item is not an object"))?;
            let name = data
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| Error::invalid_response("a repository list item has no name"))?;
            Ok(Repository::with_data(connection, &name, data))
        })
        .collect()
}

/// Options of [`clone_new`]
#[derive(Debug, Clone)]
pub struct CloneOptions {
    pub vsid: String,
    /// Repository folder with the ABAP sources (`VCS_TARGET_DIR`)
    pub start_dir: Option<String>,
    /// Token for the remote Git host (`CLIENT_VCS_AUTH_TOKEN`)
    pub vcs_token: Option<String>,
    /// Fail when the repository is already registered
    pub error_exists: bool,
    pub role: Role,
    pub typ: RepoType,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            vsid: DEFAULT_VSID.to_string(),
            start_dir: Some(DEFAULT_STARTING_FOLDER.to_string()),
            vcs_token: None,
            error_exists: true,
            role: Role::default(),
            typ: RepoType::default(),
        }
    }
}

impl CloneOptions {
    fn configuration(&self) -> ConfigMap {
        let mut config = ConfigMap::new();

        if let Some(start_dir) = self.start_dir.as_deref().filter(|d| !d.is_empty()) {
            config.insert(VCS_TARGET_DIR.to_string(), start_dir.to_string());
        }

        if let Some(token) = self.vcs_token.as_deref().filter(|t| !t.is_empty()) {
            config.insert(CLIENT_VCS_AUTH_TOKEN.to_string(), token.to_string());
        }

        config
    }
}

/// Creates the repository and clones it unless it is cloned already.
///
/// With `error_exists` off an already registered repository is not an error;
/// it is only cloned when its status says it was never cloned.
pub fn clone_new<'c>(
    connection: &'c dyn Connection,
    url: &str,
    name: &str,
    options: &CloneOptions,
) -> Result<Repository<'c>> {
    let config = options.configuration();
    let mut repo = Repository::new(connection, name);

    match repo.create(url, &options.vsid, Some(&config), options.role, options.typ) {
        Ok(()) => {}
        Err(Error::Gcts(err @ GctsError::AlreadyExists { .. })) if !options.error_exists => {
            debug!("{:?}", err);
            info!("{}", err);
            repo.wipe_data();
        }
        Err(err) => return Err(err),
    }

    if !repo.is_cloned()? {
        repo.clone_repo()?;
    } else {
        info!("Not cloning the repository \"{}\": already performed", name);
    }

    Ok(repo)
}

/// Checks out the given branch in the given repository
pub fn checkout<'c>(
    connection: &'c dyn Connection,
    branch: &str,
    target: RepoRef<'_, 'c>,
) -> Result<CommitTransition> {
    with_repository(connection, target, |repo| repo.checkout(branch))
}

/// Returns log history of the given repository
pub fn log<'c>(connection: &'c dyn Connection, target: RepoRef<'_, 'c>) -> Result<Vec<Commit>> {
    with_repository(connection, target, |repo| repo.log())
}

/// Pulls the given repository
pub fn pull<'c>(connection: &'c dyn Connection, target: RepoRef<'_, 'c>) -> Result<CommitTransition> {
    with_repository(connection, target, |repo| repo.pull())
}

/// Deletes the given repository
pub fn delete(connection: &dyn Connection, name: &str) -> Result<()> {
    Repository::new(connection, name).delete()?;
    Ok(())
}

/// Stores an API token for the logged-in user.
pub fn set_user_api_token(connection: &dyn Connection, api_url: &str, token: &str) -> Result<()> {
    let body = json!({
        "endpoint": api_url,
        "user": "",
        "password": "",
        "token": token,
        "type": "token",
    });

    connection
        .post_obj_as_json("user/credentials", body, None)
        .map_err(|err| ErrorClassifier::default().translate(err))?;

    Ok(())
}
