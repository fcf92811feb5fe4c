//! Manifest download from a GitLab instance
//!
//! [`GitLabClient`] lists every project the token can see and downloads the
//! `go.mod` file of each one together with its most recent tag. Anything that
//! can hand over manifests implements [`ManifestSource`], [`download`] stores
//! them in the [`ManifestCache`].

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::cache::ManifestCache;
use crate::constants::gitlab::{
    API_PATH, DOWNLOAD_WORKERS, FALLBACK_REF, MANIFEST_FILE, NEXT_PAGE_HEADER, PROJECTS_PER_PAGE,
    REQUEST_TIMEOUT, TOKEN_HEADER,
};
use crate::error::GomodGraphError;
use crate::progress::ProgressReporter;

/// Receives one manifest: project path, latest version and raw `go.mod`
pub type ManifestSink<'a> =
    dyn Fn(&str, Option<&str>, &[u8]) -> Result<(), GomodGraphError> + Sync + 'a;

/// Outcome of a manifest download
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub projects: usize,
    pub downloaded: usize,
    pub without_manifest: usize,
    pub errors: usize,
}

/// A place manifests can be fetched from
pub trait ManifestSource {
    /// Hand every available manifest to `sink`
    ///
    /// Failures for single projects are logged and counted in the summary,
    /// only a failure to enumerate projects at all is an error.
    fn provide_manifests(
        &self,
        sink: &ManifestSink<'_>,
        progress: Option<&mut ProgressReporter>,
    ) -> Result<FetchSummary, GomodGraphError>;
}

/// Download all manifests `source` provides into `cache`
pub fn download(
    source: &dyn ManifestSource,
    cache: &ManifestCache,
    progress: Option<&mut ProgressReporter>,
) -> Result<FetchSummary, GomodGraphError> {
    source.provide_manifests(
        &|project, version, manifest| cache.store(project, version, manifest).map(|_| ()),
        progress,
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: u64,
    pub path_with_namespace: String,
    #[serde(default)]
    pub default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

pub struct GitLabClient {
    http: Client,
    api_base: String,
}

impl GitLabClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, GomodGraphError> {
        let mut token = HeaderValue::from_str(token).map_err(|_| {
            GomodGraphError::ConfigurationError {
                message: "GitLab API token contains characters not allowed in a header".to_string(),
            }
        })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, token);

        let http = Client::builder()
            .user_agent(format!("gomodgraph/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_base: api_base_url(base_url),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn get(&self, url: &str) -> Result<Response, GomodGraphError> {
        debug!(url, "GET");
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(GomodGraphError::GitLabApi {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    /// All projects visible to the token, following pagination
    pub fn list_projects(
        &self,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<Project>, GomodGraphError> {
        let mut projects = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/projects?simple=true&per_page={}&page={}",
                self.api_base, PROJECTS_PER_PAGE, page
            );
            let response = self.get(&url)?;
            let next_page = next_page(&response);

            let batch: Vec<Project> = serde_json::from_slice(&response.bytes()?)?;
            projects.extend(batch);

            if let Some(p) = progress {
                p.scanned_page(page, projects.len());
            }

            match next_page {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(projects)
    }

    /// Raw `go.mod` of `project`, `None` if the project has none
    fn fetch_manifest(&self, project: &Project) -> Result<Option<Vec<u8>>, GomodGraphError> {
        let reference = project.default_branch.as_deref().unwrap_or(FALLBACK_REF);
        let url = format!(
            "{}/projects/{}/repository/files/{}/raw?ref={}",
            self.api_base,
            project.id,
            urlencoding::encode(MANIFEST_FILE),
            urlencoding::encode(reference)
        );

        match self.get(&url) {
            Ok(response) => Ok(Some(response.bytes()?.to_vec())),
            Err(GomodGraphError::GitLabApi { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Most recently updated tag of `project`
    fn latest_tag(&self, project: &Project) -> Result<Option<String>, GomodGraphError> {
        let url = format!(
            "{}/projects/{}/repository/tags?order_by=updated&sort=desc&per_page=1",
            self.api_base, project.id
        );
        let tags: Vec<Tag> = serde_json::from_slice(&self.get(&url)?.bytes()?)?;
        Ok(tags.into_iter().next().map(|tag| tag.name))
    }
}

impl ManifestSource for GitLabClient {
    fn provide_manifests(
        &self,
        sink: &ManifestSink<'_>,
        mut progress: Option<&mut ProgressReporter>,
    ) -> Result<FetchSummary, GomodGraphError> {
        if let Some(p) = progress.as_deref_mut() {
            p.start_project_scan();
        }
        let projects = self.list_projects(progress.as_deref())?;
        if let Some(p) = progress.as_deref_mut() {
            p.finish_project_scan(projects.len());
        }

        info!("Going to check {} projects for go.mod files", projects.len());

        let bar = progress
            .as_deref_mut()
            .map(|p| p.start_download(projects.len()));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(DOWNLOAD_WORKERS)
            .build()
            .map_err(|e| GomodGraphError::Io(std::io::Error::other(e)))?;

        let downloaded = AtomicUsize::new(0);
        let without_manifest = AtomicUsize::new(0);

        pool.install(|| {
            projects.par_iter().for_each(|project| {
                let name = project.path_with_namespace.as_str();

                let outcome = self.fetch_manifest(project).and_then(|manifest| match manifest {
                    Some(manifest) => {
                        let version = self.latest_tag(project)?;
                        sink(name, version.as_deref(), &manifest).map(|()| true)
                    }
                    None => Ok(false),
                });

                match outcome {
                    Ok(true) => {
                        downloaded.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(false) => {
                        without_manifest.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => error!(project = name, error = %e, "failed to download go.mod"),
                }

                if let Some(bar) = &bar {
                    bar.inc(1);
                }
            });
        });

        let downloaded = downloaded.into_inner();
        let without_manifest = without_manifest.into_inner();
        let summary = FetchSummary {
            projects: projects.len(),
            downloaded,
            without_manifest,
            errors: projects.len() - downloaded - without_manifest,
        };

        info!(
            "{} repositories contain no go.mod file. Downloaded {} files, {} errors occurred.",
            summary.without_manifest, summary.downloaded, summary.errors
        );

        if let Some(p) = progress {
            p.finish_download(&summary);
        }

        Ok(summary)
    }
}

/// Normalize a GitLab base URL to its REST API root
pub fn api_base_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with(API_PATH) {
        base.to_string()
    } else {
        format!("{base}/{API_PATH}")
    }
}

fn next_page(response: &Response) -> Option<usize> {
    response
        .headers()
        .get(NEXT_PAGE_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
