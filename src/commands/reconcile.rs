//! Main reconcile command

use crate::engine::{Reconciler, RunStats};
use crate::protocol::Operator;
use crate::skiplist::SkipLists;
use crate::types::RekonError;
use crate::Config;
use indicatif::HumanBytes;
use std::io::ErrorKind;
use tracing::info;

/// Run one reconciliation with fully resolved roots
pub fn run<O: Operator + ?Sized>(config: &Config, operator: &mut O) -> Result<RunStats, RekonError> {
    config.validate()?;
    let skip_lists = SkipLists::load(config)?;
    info!(
        source = %config.source.display(),
        destination = %config.destination.display(),
        dry_run = config.dry_run,
        "starting reconciliation"
    );
    Reconciler::new(config, &skip_lists, operator).run()
}

/// End-of-run totals
pub fn format_summary(stats: &RunStats) -> String {
    let mut lines = vec![
        "Summary:".to_string(),
        format!(
            "  Copied: {}  Replaced: {}  In sync: {}  Declined: {}",
            stats.copied, stats.replaced, stats.in_sync, stats.declined
        ),
        format!(
            "  Folders visited: {}  Acknowledged: {}  Skipped by list: {}",
            stats.directories, stats.acknowledged, stats.suppressed
        ),
    ];
    if stats.repositories_in_sync > 0 {
        lines.push(format!(
            "  Repositories in sync: {}",
            stats.repositories_in_sync
        ));
    }
    lines.push(format!("  Total written: {}", HumanBytes(stats.bytes_copied)));
    lines.join("\n")
}

/// Operator-facing explanation of a fatal error and what to try next
pub fn humanize_error(error: &RekonError) -> (String, Option<String>) {
    match error {
        RekonError::Io(io) => match io.kind() {
            ErrorKind::NotFound => (
                "File or directory was not found".to_string(),
                Some("Verify the path still exists and retry.".to_string()),
            ),
            ErrorKind::PermissionDenied => (
                "Permission denied while accessing file".to_string(),
                Some("Check file permissions or run with a user that has access.".to_string()),
            ),
            _ => (format!("I/O operation failed: {}", io), None),
        },
        RekonError::Config(msg) | RekonError::Validation(msg) => (msg.clone(), None),
        _ if error.is_precondition_violation() => (
            error.to_string(),
            Some("A folder changed while it was being reconciled. Run again.".to_string()),
        ),
        RekonError::UnsupportedEntry { .. } => (
            error.to_string(),
            Some("Sockets, pipes and devices have to be handled manually.".to_string()),
        ),
        _ => (error.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ScriptedOperator;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_summary_uses_human_readable_bytes() {
        let stats = RunStats {
            copied: 2,
            replaced: 1,
            bytes_copied: 5 * 1024 * 1024,
            ..RunStats::default()
        };

        let summary = format_summary(&stats);
        assert!(summary.contains("Copied: 2"));
        assert!(summary.contains("Replaced: 1"));
        assert!(summary.contains("MiB"), "got: {summary}");
        assert!(!summary.contains("Repositories"));
    }

    #[test]
    fn test_run_rejects_missing_root_before_traversal() {
        let temp = TempDir::new().expect("create tempdir");
        let config = Config {
            source: temp.path().join("missing"),
            destination: temp.path().to_path_buf(),
            source_skip_list: temp.path().join("src-skip.txt"),
            destination_skip_list: temp.path().join("dst-skip.txt"),
            ..Config::default()
        };
        let mut operator = ScriptedOperator::default();

        let result = run(&config, &mut operator);
        assert!(matches!(result, Err(RekonError::Validation(_))));
        assert!(operator.transcript().is_empty());
        assert!(!temp.path().join("src-skip.txt").exists(), "lists loaded after validation");
    }

    #[test]
    fn test_run_creates_skip_lists_and_applies_them() {
        let temp = TempDir::new().expect("create tempdir");
        let source = temp.path().join("src");
        let destination = temp.path().join("dst");
        fs::create_dir_all(source.join("node_modules")).expect("create src");
        fs::create_dir(&destination).expect("create dst");
        let lists = temp.path().join("lists");
        fs::create_dir(&lists).expect("create lists dir");
        fs::write(lists.join("src-skip.txt"), "# generated\nnode_modules\n").expect("write list");

        let config = Config {
            source,
            destination,
            source_skip_list: lists.join("src-skip.txt"),
            destination_skip_list: lists.join("nested/dst-skip.txt"),
            ..Config::default()
        };
        let mut operator = ScriptedOperator::default();

        let stats = run(&config, &mut operator).expect("run");
        assert_eq!(stats.suppressed, 1);
        assert_eq!(operator.requests().count(), 0);
        assert_eq!(
            fs::read_to_string(lists.join("nested/dst-skip.txt")).expect("read created list"),
            ""
        );
    }

    #[test]
    fn test_humanize_precondition_violation() {
        let error = RekonError::AlreadyExists {
            path: PathBuf::from("/dst/a.txt"),
        };
        let (message, suggestion) = humanize_error(&error);
        assert!(message.contains("/dst/a.txt"));
        assert!(suggestion.is_some());
    }
}
