//! # gCTS Repository Proxy
//!
//! A [`Repository`] stands for one repository registered in gCTS. It is bound
//! to a [`Connection`] and a name, and reads the server's representation of
//! the repository lazily: the first attribute read fetches it, later reads
//! are served from the cached [`Snapshot`].
//!
//! Every operation that changes server state drops the snapshot, even when the
//! request fails, so the next read sees fresh data. `set_config` is the
//! exception: it applies the same change to the cached configuration instead.
//!
//! All requests go through [`RepositoryHttp`], which prefixes the paths with
//! `repository/{name}` and passes every HTTP failure through the
//! [`ErrorClassifier`].

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::connection::{Connection, HttpResponse, Method, Request};
use crate::error::{Error, Result};
use crate::gcts::configuration::{
    entries_from_value, list_to_map, map_to_list, set_configuration_key, ConfigEntry, ConfigMap,
};
use crate::gcts::errors::ErrorClassifier;

/// Status of a repository that is registered but not cloned yet.
pub const STATUS_CREATED: &str = "CREATED";

/// Cached server data of a repository
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Snapshot {
    #[default]
    Unloaded,
    Loaded(Map<String, Value>),
}

/// Development role of a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// Development
    #[default]
    Source,
    /// Provided
    Target,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Source => "SOURCE",
            Role::Target => "TARGET",
        }
    }
}

/// Kind of remote hosting the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepoType {
    #[default]
    Github,
    Git,
}

impl RepoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoType::Github => "GITHUB",
            RepoType::Git => "GIT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RepoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SOURCE" => Ok(Role::Source),
            "TARGET" => Ok(Role::Target),
            _ => Err(format!("unknown role '{}' (expected SOURCE or TARGET)", s)),
        }
    }
}

impl FromStr for RepoType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GITHUB" => Ok(RepoType::Github),
            "GIT" => Ok(RepoType::Git),
            _ => Err(format!("unknown type '{}' (expected GITHUB or GIT)", s)),
        }
    }
}

/// One entry of the repository history
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    pub id: String,
    pub author: String,
    #[serde(rename = "authorMail")]
    pub author_mail: String,
    pub date: String,
    pub message: String,
}

/// Commits before and after a pull or a branch switch
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommitTransition {
    #[serde(rename = "fromCommit", default)]
    pub from_commit: Option<String>,
    #[serde(rename = "toCommit", default)]
    pub to_commit: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Derives a package name from a repository URL.
///
/// `https://example.com/org/myrepo.git` gives `myrepo`.
pub fn package_name_from_url(url: &str) -> &str {
    let last = url.rsplit('/').next().unwrap_or(url);
    last.strip_suffix(".git").unwrap_or(last)
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// HTTP helper scoped to one repository
///
/// Every method funnels its result through the classifier.
pub struct RepositoryHttp<'c> {
    connection: &'c dyn Connection,
    url_prefix: String,
    classifier: ErrorClassifier,
}

impl<'c> RepositoryHttp<'c> {
    fn new(connection: &'c dyn Connection, name: &str) -> Self {
        Self {
            connection,
            url_prefix: format!("repository/{}", name),
            classifier: ErrorClassifier::default(),
        }
    }

    pub fn connection(&self) -> &'c dyn Connection {
        self.connection
    }

    fn build_url(&self, path: Option<&str>) -> String {
        match path {
            Some(path) => format!("{}/{}", self.url_prefix, path),
            None => self.url_prefix.clone(),
        }
    }

    fn translate<T>(&self, result: Result<T>) -> Result<T> {
        result.map_err(|err| self.classifier.translate(err))
    }

    pub fn get(&self, path: Option<&str>, params: &[(&str, &str)]) -> Result<HttpResponse> {
        self.translate(
            self.connection
                .execute(Method::Get, &self.build_url(path), params),
        )
    }

    pub fn get_json(&self, path: Option<&str>) -> Result<Value> {
        self.translate(self.connection.get_json(&self.build_url(path)))
    }

    pub fn post(&self, path: Option<&str>) -> Result<HttpResponse> {
        self.translate(
            self.connection
                .execute(Method::Post, &self.build_url(path), &[]),
        )
    }

    pub fn post_obj_as_json(
        &self,
        path: Option<&str>,
        body: Value,
        accept: Option<&str>,
    ) -> Result<HttpResponse> {
        self.translate(
            self.connection
                .post_obj_as_json(&self.build_url(path), body, accept),
        )
    }

    pub fn delete(&self, path: Option<&str>) -> Result<HttpResponse> {
        self.translate(
            self.connection
                .execute(Method::Delete, &self.build_url(path), &[]),
        )
    }

    /// POST to the repository collection, outside of this repository's prefix.
    fn post_collection(&self, body: Value) -> Result<HttpResponse> {
        self.translate(
            self.connection.send_checked(
                Request::new(Method::Post, "repository")
                    .with_accept(Some("application/json"))
                    .with_json(body),
            ),
        )
    }
}

/// A proxy to a gCTS repository
pub struct Repository<'c> {
    http: RepositoryHttp<'c>,
    name: String,
    snapshot: Snapshot,
    config: Option<Vec<ConfigEntry>>,
}

/// The `config` list of fetched data; `None` when absent or malformed.
fn config_from_data(name: &str, data: &Map<String, Value>) -> Option<Vec<ConfigEntry>> {
    let value = data.get("config").filter(|value| !value.is_null())?;
    match entries_from_value(Some(value)) {
        Ok(entries) => Some(entries),
        Err(err) => {
            debug!("Ignoring malformed config of the repository \"{}\": {}", name, err);
            None
        }
    }
}

impl<'c> Repository<'c> {
    pub fn new(connection: &'c dyn Connection, name: &str) -> Self {
        Self {
            http: RepositoryHttp::new(connection, name),
            name: name.to_string(),
            snapshot: Snapshot::Unloaded,
            config: None,
        }
    }

    /// A proxy pre-populated with data the caller already has, e.g. an item
    /// of the repository list.
    pub fn with_data(connection: &'c dyn Connection, name: &str, data: Map<String, Value>) -> Self {
        let config = config_from_data(name, &data);

        Self {
            http: RepositoryHttp::new(connection, name),
            name: name.to_string(),
            snapshot: Snapshot::Loaded(data),
            config,
        }
    }

    /// Replaces the error patterns used for this repository's requests.
    pub fn with_classifier(mut self, classifier: ErrorClassifier) -> Self {
        self.http.classifier = classifier;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.snapshot, Snapshot::Loaded(_))
    }

    fn fetch_data(&self) -> Result<Map<String, Value>> {
        debug!("Fetching data of the repository \"{}\"", self.name);

        let response = self.http.get_json(None)?;
        let result = match response.get("result") {
            Some(Value::Object(result)) => result.clone(),
            _ => {
                return Err(Error::invalid_response(format!(
                    "the data of the repository \"{}\" has no result object",
                    self.name
                )))
            }
        };

        debug!(
            "Fetched data of the repository \"{}\": {}",
            self.name,
            Value::Object(result.clone())
        );

        Ok(result)
    }

    /// Re-reads the repository from the server regardless of the cache.
    pub fn fetch(&mut self) -> Result<()> {
        let data = self.fetch_data()?;
        self.snapshot = Snapshot::Loaded(data);
        Ok(())
    }

    fn get_item(&mut self, item: &str) -> Result<Option<Value>> {
        if let Snapshot::Loaded(data) = &self.snapshot {
            return Ok(data.get(item).cloned());
        }

        let data = self.fetch_data()?;
        let value = data.get(item).cloned();
        self.snapshot = Snapshot::Loaded(data);
        Ok(value)
    }

    /// Reads a field of the repository, fetching it first if needed.
    pub fn get_item_or(&mut self, item: &str, default: Value) -> Result<Value> {
        Ok(self.get_item(item)?.unwrap_or(default))
    }

    fn get_string(&mut self, item: &str) -> Result<Option<String>> {
        Ok(self.get_item(item)?.as_ref().and_then(value_to_string))
    }

    /// Clears cached data
    pub fn wipe_data(&mut self) {
        self.snapshot = Snapshot::Unloaded;
        self.config = None;
    }

    pub fn rid(&mut self) -> Result<Option<String>> {
        self.get_string("rid")
    }

    pub fn status(&mut self) -> Result<Option<String>> {
        self.get_string("status")
    }

    pub fn vsid(&mut self) -> Result<Option<String>> {
        self.get_string("vsid")
    }

    pub fn url(&mut self) -> Result<Option<String>> {
        self.get_string("url")
    }

    pub fn branch(&mut self) -> Result<Option<String>> {
        self.get_string("branch")
    }

    /// The current commit
    pub fn head(&mut self) -> Result<Option<String>> {
        self.get_string("currentCommit")
    }

    pub fn is_cloned(&mut self) -> Result<bool> {
        Ok(self.status()?.as_deref() != Some(STATUS_CREATED))
    }

    pub fn configuration(&mut self) -> Result<ConfigMap> {
        let config = match self.config.take() {
            Some(config) => config,
            None => {
                let value = self.get_item("config")?;
                entries_from_value(value.as_ref())?
            }
        };

        let map = list_to_map(&config);
        self.config = Some(config);
        Ok(map)
    }

    /// Applies a key change to the local config, starting from the
    /// snapshot's list when no config has been materialized yet.
    fn update_configuration(&mut self, key: &str, value: &str) {
        if self.config.is_none() {
            self.config = Some(match &self.snapshot {
                Snapshot::Loaded(data) => config_from_data(&self.name, data).unwrap_or_default(),
                Snapshot::Unloaded => Vec::new(),
            });
        }

        if let Some(config) = self.config.as_mut() {
            set_configuration_key(config, key, value);
        }
    }

    /// Registers the repository in gCTS.
    ///
    /// Fails with [`GctsError::AlreadyExists`](crate::gcts::errors::GctsError)
    /// when the server already knows the repository.
    pub fn create(
        &mut self,
        url: &str,
        vsid: &str,
        config: Option<&ConfigMap>,
        role: Role,
        typ: RepoType,
    ) -> Result<()> {
        let mut repo = match &self.snapshot {
            Snapshot::Loaded(data) => data.clone(),
            Snapshot::Unloaded => Map::new(),
        };

        repo.insert("rid".to_string(), json!(self.name));
        repo.insert("name".to_string(), json!(self.name));
        repo.insert("vsid".to_string(), json!(vsid));
        repo.insert("url".to_string(), json!(url));
        repo.insert("role".to_string(), json!(role.as_str()));
        repo.insert("type".to_string(), json!(typ.as_str()));
        repo.insert("connection".to_string(), json!("ssl"));

        if let Some(config) = config.filter(|config| !config.is_empty()) {
            let mut repo_config = list_to_map(&entries_from_value(repo.get("config"))?);
            repo_config.extend(config.iter().map(|(k, v)| (k.clone(), v.clone())));
            repo.insert(
                "config".to_string(),
                serde_json::to_value(map_to_list(&repo_config))?,
            );
        }

        let create_request = json!({
            "repository": self.name,
            "data": repo,
        });

        let response = self.http.post_collection(create_request)?;
        let body: Value = response.json()?;
        let result = match body.get("repository") {
            Some(Value::Object(result)) => result.clone(),
            _ => {
                return Err(Error::invalid_response(format!(
                    "the creation response of the repository \"{}\" has no repository object",
                    self.name
                )))
            }
        };

        match &mut self.snapshot {
            Snapshot::Loaded(data) => data.extend(result),
            Snapshot::Unloaded => self.snapshot = Snapshot::Loaded(result),
        }
        // the server may have merged configuration the cached list lacks
        self.config = None;

        Ok(())
    }

    /// Sets a configuration value on the server and in the local cache.
    pub fn set_config(&mut self, key: &str, value: &str) -> Result<()> {
        self.http
            .post_obj_as_json(Some("config"), json!({"key": key, "value": value}), None)?;

        self.update_configuration(key, value);
        Ok(())
    }

    /// Returns a configuration value, asking the server only on a cache miss.
    pub fn get_config(&mut self, key: &str) -> Result<String> {
        if let Some(value) = self.configuration()?.remove(key) {
            return Ok(value);
        }

        let response = self.http.get_json(Some(&format!("config/{}", key)))?;
        let value = response
            .get("result")
            .and_then(|result| result.get("value"))
            .and_then(value_to_string)
            .ok_or_else(|| {
                Error::invalid_response(format!(
                    "no value for the configuration key \"{}\" of the repository \"{}\"",
                    key, self.name
                ))
            })?;

        self.update_configuration(key, &value);
        Ok(value)
    }

    /// Clones the repository on the configured system
    pub fn clone_repo(&mut self) -> Result<HttpResponse> {
        let response = self.http.post(Some("clone"));
        self.wipe_data();
        response
    }

    /// Switches the repository to `branch`.
    ///
    /// The service routes the switch through the current branch:
    /// `branches/{current}/switch?branch={target}`.
    pub fn checkout(&mut self, branch: &str) -> Result<CommitTransition> {
        let current = self.branch()?.ok_or_else(|| {
            Error::invalid_response(format!(
                "the repository \"{}\" reports no current branch",
                self.name
            ))
        })?;

        let response = self.http.get(
            Some(&format!("branches/{}/switch", current)),
            &[("branch", branch)],
        );
        self.wipe_data();

        let body: Value = response?.json()?;
        match body.get("result") {
            Some(result) => Ok(CommitTransition::deserialize(result)?),
            None => Err(Error::invalid_response(format!(
                "the checkout response of the repository \"{}\" has no result",
                self.name
            ))),
        }
    }

    /// Returns commits of the repository, newest first
    pub fn log(&self) -> Result<Vec<Commit>> {
        let body = self.http.get_json(Some("getCommit"))?;

        match body.get("commits") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(commits) => Ok(Vec::<Commit>::deserialize(commits)?),
        }
    }

    /// Pulls the repo on the configured system
    pub fn pull(&mut self) -> Result<CommitTransition> {
        let body = self.http.get_json(Some("pullByCommit"));
        self.wipe_data();

        Ok(CommitTransition::deserialize(&body?)?)
    }

    /// Deletes the repo from the configured system
    pub fn delete(&mut self) -> Result<HttpResponse> {
        let response = self.http.delete(None);
        self.wipe_data();
        response
    }

    /// Turns a transport into a commit
    pub fn commit_transport(
        &mut self,
        corrnr: &str,
        message: &str,
        description: Option<&str>,
    ) -> Result<HttpResponse> {
        let mut commit = json!({
            "message": message,
            "autoPush": "true",
            "objects": [{"object": corrnr, "type": "TRANSPORT"}],
        });

        if let Some(description) = description.filter(|d| !d.is_empty()) {
            commit["description"] = json!(description);
        }

        let response = self.http.post_obj_as_json(Some("commit"), commit, None);
        self.wipe_data();
        response
    }

    /// Points the repository at a new remote URL.
    ///
    /// Returns `None` without posting when the URL is already set.
    pub fn set_url(&mut self, url: &str) -> Result<Option<HttpResponse>> {
        let mut data = self.fetch_data()?;
        if data.get("url").and_then(Value::as_str) == Some(url) {
            return Ok(None);
        }

        data.insert("url".to_string(), json!(url));
        let response = self.http.post_obj_as_json(None, Value::Object(data), None);
        self.wipe_data();
        response.map(Some)
    }
}

impl fmt::Debug for Repository<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("name", &self.name)
            .field("snapshot", &self.snapshot)
            .field("config", &self.config)
            .finish()
    }
}
