//! Group source report
//!
//! Looks up each configured group in Microsoft Graph and reports whether it
//! is cloud-only or synchronized from on-premises Active Directory.

use crate::classify::GroupReport;
use crate::cmd::progress;
use crate::config::{self, Credentials, RunConfig};
use crate::error::Result;
use crate::graph::auth::GraphAuth;
use crate::graph::groups::{GroupDirectory, LookupOptions};
use crate::graph::GraphClient;
use crate::report;
use clap::Args;
use colored::Colorize;
use indicatif::ProgressBar;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Path to a newline-separated file with custom group names
    #[arg(long, value_name = "PATH")]
    pub names_file: Option<PathBuf>,

    /// Optional CSV file to store the detailed results
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// HTTP timeout for Graph calls, in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// dotenv-style file supplying AZURE_* variables missing from the environment
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Print Graph query diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl ReportArgs {
    /// Resolve names and credentials once, before any network traffic
    pub fn into_config(self) -> Result<RunConfig> {
        let group_names = config::load_group_names(self.names_file.as_deref())?;
        let credentials = match &self.env_file {
            Some(path) => Credentials::from_env_with_file(path)?,
            None => Credentials::from_env()?,
        };

        Ok(RunConfig {
            credentials,
            group_names,
            timeout: Duration::from_secs(self.timeout),
            verbose: self.verbose,
            output: self.output,
        })
    }
}

pub async fn run(args: ReportArgs) -> Result<()> {
    let config = args.into_config()?;

    let mut auth = GraphAuth::new(config.credentials.clone());
    let spinner = progress::create_spinner("Acquiring Microsoft Graph token...");
    let token = match auth.acquire_token().await {
        Ok(token) => {
            progress::finish_spinner_success(&spinner, "Authenticated to Microsoft Graph");
            token
        }
        Err(e) => {
            progress::finish_spinner_error(&spinner, "Authentication failed");
            return Err(e);
        }
    };

    let graph = GraphClient::new(token);
    let records = generate_report(&graph, &config).await;

    report::print_table(&records);
    report::print_summary(&records);

    if let Some(path) = &config.output {
        report::write_csv(path, &records)?;
    }

    Ok(())
}

/// Evaluate every configured name against `directory` and return the report rows
pub async fn generate_report<D: GroupDirectory>(directory: &D, config: &RunConfig) -> Vec<GroupReport> {
    let options = LookupOptions {
        timeout: config.timeout,
        verbose: config.verbose,
    };

    // Verbose output goes line by line to stderr; a bar would fight with it
    let bar = if config.verbose {
        ProgressBar::hidden()
    } else {
        progress::create_lookup_bar(config.group_names.len() as u64)
    };

    let records = evaluate_groups(directory, &config.group_names, &options, &bar).await;
    bar.finish_and_clear();
    records
}

/// Look up and classify each name in order. A failed lookup becomes an
/// `error` row and evaluation moves on to the next name.
pub async fn evaluate_groups<D: GroupDirectory>(
    directory: &D,
    group_names: &[String],
    options: &LookupOptions,
    bar: &ProgressBar,
) -> Vec<GroupReport> {
    evaluate_groups_with_diagnostics(directory, group_names, options, bar, &mut std::io::stderr())
        .await
}

/// Same as [`evaluate_groups`], writing verbose diagnostics to `diagnostics`
pub async fn evaluate_groups_with_diagnostics<D: GroupDirectory, W: Write>(
    directory: &D,
    group_names: &[String],
    options: &LookupOptions,
    bar: &ProgressBar,
    diagnostics: &mut W,
) -> Vec<GroupReport> {
    let mut records = Vec::with_capacity(group_names.len());

    for name in group_names {
        bar.set_message(name.clone());
        if options.verbose {
            // Diagnostics are best effort; a closed stderr must not abort the batch
            let _ = writeln!(diagnostics, "{} Querying Graph for '{}'", "→".cyan(), name);
        }

        let record = match directory.find_group(name, options).await {
            Ok(group) => GroupReport::from_lookup(name, group.as_ref()),
            Err(e) => {
                let detail = e.detail();
                tracing::warn!("Lookup for '{}' failed: {}", name, detail);
                if options.verbose {
                    let _ = writeln!(
                        diagnostics,
                        "{} Lookup for '{}' failed: {}",
                        "✗".red(),
                        name,
                        detail
                    );
                }
                GroupReport::from_error(name, &e)
            }
        };

        records.push(record);
        bar.inc(1);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::GroupSource;
    use crate::error::GroupSourceError;
    use crate::graph::groups::Group;
    use std::cell::RefCell;

    /// In-memory directory that records the names it was asked for
    struct FakeDirectory {
        calls: RefCell<Vec<String>>,
    }

    impl FakeDirectory {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl GroupDirectory for FakeDirectory {
        async fn find_group(
            &self,
            display_name: &str,
            _options: &LookupOptions,
        ) -> Result<Option<Group>> {
            self.calls.borrow_mut().push(display_name.to_string());

            match display_name {
                "Broken" => Err(GroupSourceError::GraphApiError(
                    "HTTP 503 Service Unavailable: ServiceUnavailable".into(),
                )),
                "Missing" => Ok(None),
                name => Ok(Some(Group {
                    id: Some(format!("id-{}", name)),
                    display_name: Some(name.to_string()),
                    on_premises_sync_enabled: Some(name.starts_with("Synced")),
                    ..Default::default()
                })),
            }
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let directory = FakeDirectory::new();
        let input = names(&["SyncedOne", "Broken", "Missing", "CloudTwo"]);

        let records = evaluate_groups(
            &directory,
            &input,
            &LookupOptions::default(),
            &ProgressBar::hidden(),
        )
        .await;

        let requested: Vec<_> = records.iter().map(|r| r.requested_name.as_str()).collect();
        assert_eq!(requested, vec!["SyncedOne", "Broken", "Missing", "CloudTwo"]);
        assert_eq!(*directory.calls.borrow(), input);

        let sources: Vec<_> = records.iter().map(|r| r.source).collect();
        assert_eq!(
            sources,
            vec![
                GroupSource::OnPrem,
                GroupSource::Error,
                GroupSource::NotFound,
                GroupSource::Cloud,
            ]
        );
        assert!(records[1].reason.starts_with("request failed: "));
        assert!(records[1].reason.contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_verbose_writes_per_query_diagnostics() {
        let directory = FakeDirectory::new();
        let input = names(&["Missing", "Broken"]);
        let options = LookupOptions {
            verbose: true,
            ..LookupOptions::default()
        };
        let mut diagnostics = Vec::new();

        let records = evaluate_groups_with_diagnostics(
            &directory,
            &input,
            &options,
            &ProgressBar::hidden(),
            &mut diagnostics,
        )
        .await;

        let output = String::from_utf8(diagnostics).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(records.len(), 2);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("Querying Graph for 'Missing'"));
        assert!(lines[1].ends_with("Querying Graph for 'Broken'"));
        assert!(lines[2].contains("Lookup for 'Broken' failed: Graph API error: HTTP 503"));
    }

    #[tokio::test]
    async fn test_quiet_run_writes_no_diagnostics() {
        let directory = FakeDirectory::new();
        let mut diagnostics = Vec::new();

        evaluate_groups_with_diagnostics(
            &directory,
            &names(&["Missing", "Broken"]),
            &LookupOptions::default(),
            &ProgressBar::hidden(),
            &mut diagnostics,
        )
        .await;

        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_are_not_collapsed() {
        let directory = FakeDirectory::new();
        let input = names(&["Missing", "Missing"]);

        let records = evaluate_groups(
            &directory,
            &input,
            &LookupOptions::default(),
            &ProgressBar::hidden(),
        )
        .await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
        assert_eq!(directory.calls.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_generate_report_uses_config_names() {
        let directory = FakeDirectory::new();
        let config = RunConfig {
            credentials: Credentials {
                tenant_id: "t".into(),
                client_id: "c".into(),
                client_secret: "s".into(),
            },
            group_names: names(&["CloudOnly"]),
            timeout: Duration::from_secs(5),
            verbose: true,
            output: None,
        };

        let records = generate_report(&directory, &config).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].matched_name, "CloudOnly");
        assert_eq!(records[0].group_id, "id-CloudOnly");
    }

    #[test]
    fn test_missing_names_file_fails_before_credentials() {
        let args = ReportArgs {
            names_file: Some(PathBuf::from("/nonexistent/groups.txt")),
            output: None,
            timeout: 15,
            env_file: None,
            verbose: false,
        };

        let err = args.into_config().unwrap_err();
        assert!(matches!(err, GroupSourceError::NamesFileNotFound(_)));
    }
}
