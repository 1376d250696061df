//! Subversion client adapter backed by the `svn` command line.

use std::path::Path;
use std::time::Duration;

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::adapters::process::{CancelToken, ProcessRunner};
use crate::domain::{AppError, ArtifactEntry, SvnConfig};
use crate::ports::RepositoryPort;

#[derive(Debug, Clone)]
pub struct SvnCommandAdapter {
    program: String,
    runner: ProcessRunner,
}

impl SvnCommandAdapter {
    pub fn new(config: &SvnConfig, cancel: CancelToken) -> Self {
        Self {
            program: config.program.clone(),
            runner: ProcessRunner::new(Duration::from_secs(config.timeout_secs), cancel),
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }
}

impl RepositoryPort for SvnCommandAdapter {
    fn list(&self, location: &Url) -> Result<Vec<ArtifactEntry>, AppError> {
        let args = ["list", "--xml", "--non-interactive", location.as_str()];
        let output = self
            .runner
            .run(&self.program, &args)
            .map_err(|err| err.into_command_failure(self.command_line(&args)))?;

        let entries = parse_list_xml(&output.stdout, location)?;
        info!(location = %location, count = entries.len(), "listed configuration artifacts");
        Ok(entries)
    }

    fn export(&self, url: &str, destination: &Path) -> Result<(), AppError> {
        let destination = destination.to_string_lossy();
        let args = ["export", "--force", "--non-interactive", url, destination.as_ref()];
        debug!(url, destination = %destination, "exporting artifact");

        match self.runner.run(&self.program, &args) {
            Ok(_) => Ok(()),
            Err(err) if err.is_interrupted() => {
                Err(err.into_command_failure(self.command_line(&args)))
            }
            Err(err) => Err(AppError::ExportFailure { url: url.to_string(), details: err.details() }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListsDocument {
    #[serde(default)]
    list: Vec<ListNode>,
}

#[derive(Debug, Deserialize)]
struct ListNode {
    #[serde(default)]
    entry: Vec<EntryNode>,
}

#[derive(Debug, Deserialize)]
struct EntryNode {
    #[serde(rename = "@kind")]
    kind: String,
    name: String,
    commit: Option<CommitNode>,
}

#[derive(Debug, Deserialize)]
struct CommitNode {
    date: Option<String>,
}

/// Parse `svn list --xml` output into artifact entries for files with a
/// configuration extension. The URL of each entry is `location` joined with
/// the (percent-encoded) file name.
pub fn parse_list_xml(xml: &str, location: &Url) -> Result<Vec<ArtifactEntry>, AppError> {
    expect_root_element(xml, "lists")?;
    let document: ListsDocument =
        quick_xml::de::from_str(xml).map_err(|err| AppError::MalformedResponse(err.to_string()))?;

    let mut entries = Vec::new();
    for entry in document.list.into_iter().flat_map(|list| list.entry) {
        if entry.kind != "file" || !ArtifactEntry::has_artifact_extension(&entry.name) {
            continue;
        }
        let url = artifact_url(location, &entry.name)?;
        let timestamp = entry
            .commit
            .and_then(|commit| commit.date)
            .map(|date| date.trim().to_string())
            .unwrap_or_default();
        entries.push(ArtifactEntry::new(entry.name, url.to_string(), timestamp));
    }
    Ok(entries)
}

/// The serde deserializer accepts any root element, so a well-formed document
/// of another kind (an HTML error page, say) must be rejected up front.
fn expect_root_element(xml: &str, expected: &str) -> Result<(), AppError> {
    let mut reader = Reader::from_str(xml);
    loop {
        let event = reader.read_event().map_err(|err| AppError::MalformedResponse(err.to_string()))?;
        let root = match event {
            Event::Start(start) | Event::Empty(start) => {
                String::from_utf8_lossy(start.name().as_ref()).into_owned()
            }
            Event::Eof => {
                return Err(AppError::MalformedResponse("empty listing output".to_string()));
            }
            _ => continue,
        };
        if root == expected {
            return Ok(());
        }
        return Err(AppError::MalformedResponse(format!(
            "expected <{}> root element, found <{}>",
            expected, root
        )));
    }
}

fn artifact_url(location: &Url, name: &str) -> Result<Url, AppError> {
    let mut url = location.clone();
    url.path_segments_mut()
        .map_err(|_| {
            AppError::config_error(format!("Repository location '{}' cannot hold files", location))
        })?
        .pop_if_empty()
        .push(name);
    Ok(url)
}
