//! Upload through an external `curl` process.
//!
//! Only compiled with the `curl-command` feature. The generated command line
//! carries the API key in plain text, so it is visible to anyone who can list
//! processes or read shell history. [`FileApi::upload`](crate::FileApi::upload)
//! remains the normal upload path.

use crate::{
    apis::file::{check_upload_args, effective_transport},
    config::DataFlowConfig,
    error::DataFlowResult,
    models::Transport,
};
use log::warn;
use std::{path::Path, process::ExitStatus};

/// A multipart upload expressed as a `curl` invocation
#[derive(Clone, PartialEq, Eq)]
pub struct CurlUpload {
    segments: Vec<(Option<&'static str>, String)>,
}

impl CurlUpload {
    /// Build the curl equivalent of [`FileApi::upload`](crate::FileApi::upload)
    pub fn new(
        config: &DataFlowConfig,
        file_path: impl AsRef<Path>,
        dataset_id: i64,
        relative_path: Option<&str>,
        transport: Option<Transport>,
    ) -> DataFlowResult<Self> {
        let file_path = file_path.as_ref();
        check_upload_args(file_path, dataset_id, relative_path)?;
        let transport = effective_transport(transport);
        let url = config.endpoint("dataset-file-upload")?;

        let mut segments = vec![
            (Some("-X"), "POST".to_string()),
            (None, url.to_string()),
            (Some("-H"), "accept: */*".to_string()),
            (Some("-H"), "Content-Type: multipart/form-data".to_string()),
            (Some("-H"), format!("Authorization: Bearer {}", config.api_key())),
            (Some("-F"), format!("file=@{}", form_quote(&file_path.display().to_string()))),
            (Some("--form-string"), format!("dataset_id={}", dataset_id)),
        ];
        if let Some(relative_path) = relative_path {
            segments.push((Some("--form-string"), format!("relative_path={}", relative_path)));
        }
        segments.push((Some("--form-string"), format!("transport={}", transport)));

        warn!("curl upload command embeds the DataFlow API key in its arguments");
        Ok(Self { segments })
    }

    /// Arguments passed to the `curl` executable
    pub fn args(&self) -> Vec<String> {
        self.segments
            .iter()
            .flat_map(|(flag, value)| flag.map(str::to_string).into_iter().chain([value.clone()]))
            .collect()
    }

    /// Single-line, shell-quoted command
    pub fn to_shell_string(&self) -> String {
        self.render(" ")
    }

    /// One option per line, for printing
    pub fn to_multiline(&self) -> String {
        self.render(" \\\n  ")
    }

    fn render(&self, joiner: &str) -> String {
        let mut parts = vec!["curl".to_string()];
        for (flag, value) in &self.segments {
            match flag {
                Some(flag) => parts.push(format!("{} {}", flag, shell_quote(value))),
                None => parts.push(shell_quote(value)),
            }
        }
        parts.join(joiner)
    }

    /// Run `curl` as a child process and wait for it to exit
    pub async fn execute(&self) -> DataFlowResult<ExitStatus> {
        warn!("Executing curl upload; the API key is visible in the process list");
        let status = tokio::process::Command::new("curl")
            .args(self.args())
            .status()
            .await?;
        Ok(status)
    }
}

impl std::fmt::Debug for CurlUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurlUpload").finish_non_exhaustive()
    }
}

/// Double-quote a `-F` file name so `;` and `,` are not read as part directives
fn form_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
