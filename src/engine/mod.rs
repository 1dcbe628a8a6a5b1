//! Reconciliation engine
//!
//! Depth-first descent over matched directory pairs. At every level both
//! sides are listed and merged, one-sided names are filtered through the
//! skip lists and offered (source) or acknowledged (destination), then each
//! common name is classified and resolved through the operator. Nothing is
//! ever deleted and nothing is overwritten without a `y`.

use crate::diff::{classify, is_repository, merge_entries, repositories_match, Classification};
use crate::executor::Executor;
use crate::protocol::{decide, Choice, DecisionRequest, Event, Operator};
use crate::scanner::list_entries;
use crate::skiplist::SkipLists;
use crate::types::{Context, DirectoryPair, Entry, RekonError};
use crate::Config;
use tracing::{debug, warn};

/// Counters reported at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    /// Directory levels listed, roots included
    pub directories: usize,

    pub in_sync: usize,

    pub copied: usize,

    pub replaced: usize,

    /// Bytes written by copies and replacements (zero under dry-run)
    pub bytes_copied: u64,

    /// Offers answered with `n`
    pub declined: usize,

    pub acknowledged: usize,

    /// One-sided entries hidden by a skip list
    pub suppressed: usize,

    /// Paired working copies with identical shapes
    pub repositories_in_sync: usize,
}

/// One reconciliation run between the roots of `config`
pub struct Reconciler<'a, O: Operator + ?Sized> {
    config: &'a Config,
    skip_lists: &'a SkipLists,
    operator: &'a mut O,
    executor: Executor,
    stats: RunStats,
}

impl<'a, O: Operator + ?Sized> Reconciler<'a, O> {
    pub fn new(config: &'a Config, skip_lists: &'a SkipLists, operator: &'a mut O) -> Self {
        Self {
            config,
            skip_lists,
            operator,
            executor: Executor::from_config(config),
            stats: RunStats::default(),
        }
    }

    /// Walk the whole tree.
    ///
    /// # Errors
    /// * `RekonError::Quit` as soon as the operator quits
    /// * Any listing, precondition or I/O failure, which ends the run
    pub fn run(mut self) -> Result<RunStats, RekonError> {
        let root = Context::root(
            Entry::from_path(&self.config.source)?,
            Entry::from_path(&self.config.destination)?,
        );
        self.operator.show(
            root.depth(),
            &Event::Enter {
                name: root.pair().display.clone(),
            },
        )?;
        self.reconcile_level(&root)?;
        debug!(stats = ?self.stats, "run finished");
        Ok(self.stats)
    }

    fn reconcile_level(&mut self, ctx: &Context<'_>) -> Result<(), RekonError> {
        let pair = ctx.pair();
        let depth = ctx.depth();
        self.stats.directories += 1;
        debug!(source = %pair.source.path.display(), depth, "reconciling level");

        let source_entries = list_entries(&pair.source.path)?;
        let destination_entries = list_entries(&pair.destination.path)?;
        let merge = merge_entries(&source_entries, &destination_entries);

        let base = ctx.relative_path();
        let mut source_extras = Vec::with_capacity(merge.left_only.len());
        for entry in merge.left_only {
            if self.skip_lists.source_ignores(&base.join(&entry.name)) {
                debug!(name = %entry.display_name(), "source extra suppressed");
                self.stats.suppressed += 1;
            } else {
                source_extras.push(entry);
            }
        }
        let mut destination_extras = Vec::with_capacity(merge.right_only.len());
        for entry in merge.right_only {
            if self.skip_lists.destination_ignores(&base.join(&entry.name)) {
                debug!(name = %entry.display_name(), "destination extra suppressed");
                self.stats.suppressed += 1;
            } else {
                destination_extras.push(entry);
            }
        }

        if !source_extras.is_empty() {
            self.offer_source_extras(ctx, &source_extras)?;
        }
        if !destination_extras.is_empty() {
            let request = DecisionRequest::DestinationExtras {
                names: display_names(&destination_extras),
            };
            decide(&mut *self.operator, depth, &request)?;
            self.stats.acknowledged += 1;
        }

        for (source, destination) in merge.common {
            let child = ctx.child(DirectoryPair::new(source.clone(), destination.clone()));
            self.operator.show(
                child.depth(),
                &Event::Enter {
                    name: child.pair().display.clone(),
                },
            )?;
            self.reconcile_entry(&child)?;
        }
        Ok(())
    }

    fn offer_source_extras(&mut self, ctx: &Context<'_>, extras: &[&Entry]) -> Result<(), RekonError> {
        let depth = ctx.depth();
        let request = DecisionRequest::SourceExtras {
            names: display_names(extras),
        };
        match decide(&mut *self.operator, depth, &request)? {
            Choice::Yes => {
                for entry in extras {
                    self.copy(ctx, entry)?;
                }
            }
            Choice::Select => {
                for entry in extras {
                    let request = DecisionRequest::CopyItem {
                        name: entry.display_name(),
                    };
                    match decide(&mut *self.operator, depth, &request)? {
                        Choice::Yes => self.copy(ctx, entry)?,
                        _ => self.stats.declined += 1,
                    }
                }
                self.operator.show(depth, &Event::AllProcessed)?;
            }
            _ => self.stats.declined += extras.len(),
        }
        Ok(())
    }

    fn copy(&mut self, ctx: &Context<'_>, entry: &Entry) -> Result<(), RekonError> {
        let bytes = self
            .executor
            .copy_entry(entry, &ctx.pair().destination.path)?;
        self.stats.copied += 1;
        self.stats.bytes_copied += bytes;
        self.operator.show(
            ctx.depth(),
            &Event::Copied {
                name: entry.display_name(),
            },
        )
    }

    fn reconcile_entry(&mut self, ctx: &Context<'_>) -> Result<(), RekonError> {
        let pair = ctx.pair();
        let depth = ctx.depth();
        let name = pair.display.clone();

        match classify(&pair.source, &pair.destination, self.config.time_mode)? {
            Classification::KindMismatch {
                source,
                destination,
            } => {
                let request = DecisionRequest::KindMismatch {
                    name,
                    source,
                    destination,
                };
                decide(&mut *self.operator, depth, &request)?;
                self.stats.acknowledged += 1;
            }
            Classification::Directories => {
                if is_repository(&pair.source.path) && is_repository(&pair.destination.path) {
                    self.check_repositories(ctx)?;
                } else {
                    self.reconcile_level(ctx)?;
                }
            }
            Classification::Content(divergence) => {
                let request = DecisionRequest::ContentDivergence {
                    name: name.clone(),
                    entry_kind: pair.source.kind,
                    size: divergence.size,
                    time: divergence.time,
                };
                match decide(&mut *self.operator, depth, &request)? {
                    Choice::Yes => {
                        let bytes = self.executor.replace_entry(&pair.source, &pair.destination)?;
                        self.stats.replaced += 1;
                        self.stats.bytes_copied += bytes;
                        self.operator.show(depth, &Event::Replaced { name })?;
                    }
                    _ => self.stats.declined += 1,
                }
            }
            Classification::InSync => self.stats.in_sync += 1,
        }
        Ok(())
    }

    fn check_repositories(&mut self, ctx: &Context<'_>) -> Result<(), RekonError> {
        let pair = ctx.pair();
        let name = pair.display.clone();
        if repositories_match(&pair.source.path, &pair.destination.path)? {
            debug!(%name, "repository shapes match");
            self.stats.repositories_in_sync += 1;
            self.operator
                .show(ctx.depth(), &Event::RepositoryInSync { name })
        } else {
            warn!(source = %pair.source.path.display(), "repository differs from destination");
            decide(
                &mut *self.operator,
                ctx.depth(),
                &DecisionRequest::RepositoryDivergence { name },
            )?;
            self.stats.acknowledged += 1;
            Ok(())
        }
    }
}

fn display_names(entries: &[&Entry]) -> Vec<String> {
    entries.iter().map(|entry| entry.display_name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Record, ScriptedOperator};
    use crate::skiplist::SuffixTrie;
    use crate::types::EntryKind;
    use filetime::FileTime;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct Roots {
        _temp: TempDir,
        config: Config,
    }

    fn roots(dry_run: bool) -> Roots {
        let temp = TempDir::new().expect("create tempdir");
        let source = temp.path().join("src");
        let destination = temp.path().join("dst");
        fs::create_dir(&source).expect("create src");
        fs::create_dir(&destination).expect("create dst");
        let config = Config {
            source,
            destination,
            dry_run,
            ..Config::default()
        };
        Roots {
            _temp: temp,
            config,
        }
    }

    fn write(path: &Path, content: &str, mtime: i64) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, content).expect("write file");
        filetime::set_file_mtime(path, FileTime::from_unix_time(mtime, 0)).expect("set mtime");
    }

    fn run(
        config: &Config,
        skip_lists: &SkipLists,
        answers: &[&str],
    ) -> (Result<RunStats, RekonError>, ScriptedOperator) {
        let mut operator = ScriptedOperator::new(answers.iter().copied());
        let result = Reconciler::new(config, skip_lists, &mut operator).run();
        (result, operator)
    }

    #[test]
    fn test_size_divergence_declined() {
        let roots = roots(false);
        let src = roots.config.source.join("a.txt");
        let dst = roots.config.destination.join("a.txt");
        write(&src, "hello", 1_600_000_000);
        write(&dst, "hi", 1_600_000_000);

        let (result, operator) = run(&roots.config, &SkipLists::default(), &["n"]);
        let stats = result.expect("run");

        let requests: Vec<_> = operator.requests().cloned().collect();
        assert_eq!(
            requests,
            vec![DecisionRequest::ContentDivergence {
                name: "a.txt".into(),
                entry_kind: EntryKind::File,
                size: Some((5, 2)),
                time: None,
            }]
        );
        assert_eq!(stats.declined, 1);
        assert_eq!(fs::read_to_string(&dst).expect("read dst"), "hi");
    }

    #[test]
    fn test_replace_on_yes() {
        let roots = roots(false);
        let dst = roots.config.destination.join("a.txt");
        write(&roots.config.source.join("a.txt"), "new", 1_600_000_100);
        write(&dst, "old", 1_600_000_000);

        let (result, operator) = run(&roots.config, &SkipLists::default(), &["y"]);
        let stats = result.expect("run");

        assert_eq!(stats.replaced, 1);
        assert_eq!(fs::read_to_string(&dst).expect("read dst"), "new");
        assert!(operator
            .events()
            .any(|event| *event == Event::Replaced { name: "a.txt".into() }));
    }

    #[test]
    fn test_size_and_time_give_one_prompt() {
        let roots = roots(false);
        write(&roots.config.source.join("a.txt"), "hello", 1_600_000_100);
        write(&roots.config.destination.join("a.txt"), "hi", 1_600_000_000);

        let (result, operator) = run(&roots.config, &SkipLists::default(), &["n"]);
        result.expect("run");

        let requests: Vec<_> = operator.requests().collect();
        assert_eq!(requests.len(), 1);
        match requests[0] {
            DecisionRequest::ContentDivergence { size, time, .. } => {
                assert!(size.is_some());
                assert!(time.is_some());
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_copy_all_source_extras() {
        let roots = roots(false);
        write(&roots.config.source.join("new.txt"), "fresh", 1_600_000_000);
        write(&roots.config.source.join("photos/1.jpg"), "jpeg", 1_600_000_000);

        let (result, operator) = run(&roots.config, &SkipLists::default(), &["y"]);
        let stats = result.expect("run");

        assert_eq!(stats.copied, 2);
        assert_eq!(stats.bytes_copied, 9);
        assert_eq!(
            fs::read_to_string(roots.config.destination.join("new.txt")).expect("read copy"),
            "fresh"
        );
        assert!(roots.config.destination.join("photos/1.jpg").is_file());
        assert_eq!(
            operator.requests().next(),
            Some(&DecisionRequest::SourceExtras {
                names: vec!["new.txt".into(), "photos".into()]
            })
        );
    }

    #[test]
    fn test_select_copies_chosen_items() {
        let roots = roots(false);
        write(&roots.config.source.join("a.txt"), "a", 1_600_000_000);
        write(&roots.config.source.join("b.txt"), "b", 1_600_000_000);

        let (result, operator) = run(&roots.config, &SkipLists::default(), &["s", "y", "n"]);
        let stats = result.expect("run");

        assert!(roots.config.destination.join("a.txt").exists());
        assert!(!roots.config.destination.join("b.txt").exists());
        assert_eq!(stats.copied, 1);
        assert_eq!(stats.declined, 1);
        assert_eq!(operator.events().last(), Some(&Event::AllProcessed));
    }

    #[test]
    fn test_skip_listed_extras_are_never_offered() {
        let roots = roots(false);
        write(&roots.config.source.join("Thumbs.db"), "x", 1_600_000_000);
        write(&roots.config.source.join("docs/cache/tmp.bin"), "x", 1_600_000_000);
        write(&roots.config.destination.join("docs/readme.md"), "x", 1_600_000_000);
        write(&roots.config.destination.join(".DS_Store"), "x", 1_600_000_000);
        write(&roots.config.source.join("keep.txt"), "x", 1_600_000_000);

        let skip_lists = SkipLists::new(
            SuffixTrie::parse("Thumbs.db\ndocs/cache\n"),
            SuffixTrie::parse(".DS_Store\nreadme.md\n"),
        );
        let (result, operator) = run(&roots.config, &skip_lists, &["n"]);
        let stats = result.expect("run");

        assert_eq!(stats.suppressed, 4);
        let requests: Vec<_> = operator.requests().cloned().collect();
        assert_eq!(
            requests,
            vec![DecisionRequest::SourceExtras {
                names: vec!["keep.txt".into()]
            }]
        );
    }

    #[test]
    fn test_destination_extras_need_acknowledgment() {
        let roots = roots(false);
        let old = roots.config.destination.join("old.txt");
        write(&old, "keep me", 1_600_000_000);

        let (result, operator) = run(&roots.config, &SkipLists::default(), &["y", "a"]);
        let stats = result.expect("run");

        assert_eq!(stats.acknowledged, 1);
        assert!(old.exists());
        assert_eq!(operator.requests().count(), 2, "[y] is not a valid acknowledgment");
    }

    #[test]
    fn test_identical_repositories_are_not_descended() {
        let roots = roots(false);
        for root in [&roots.config.source, &roots.config.destination] {
            fs::create_dir_all(root.join("proj/.git/objects")).expect("create repo");
            fs::create_dir_all(root.join("proj/src")).expect("create src");
        }
        write(&roots.config.source.join("proj/src/main.rs"), "fn main() {}", 1_600_000_100);
        write(&roots.config.destination.join("proj/src/main.rs"), "", 1_600_000_000);
        write(&roots.config.source.join("proj/new.txt"), "x", 1_600_000_000);

        let (result, operator) = run(&roots.config, &SkipLists::default(), &[]);
        let stats = result.expect("run");

        assert_eq!(operator.requests().count(), 0);
        assert_eq!(stats.repositories_in_sync, 1);
        assert!(operator
            .events()
            .any(|event| *event == Event::RepositoryInSync { name: "proj".into() }));
    }

    #[test]
    fn test_divergent_repository_needs_acknowledgment() {
        let roots = roots(false);
        for root in [&roots.config.source, &roots.config.destination] {
            fs::create_dir_all(root.join("proj/.git")).expect("create repo");
        }
        fs::create_dir(roots.config.source.join("proj/extra")).expect("create extra");

        let (result, operator) = run(&roots.config, &SkipLists::default(), &["a"]);
        let stats = result.expect("run");

        assert_eq!(stats.acknowledged, 1);
        assert_eq!(
            operator.requests().next(),
            Some(&DecisionRequest::RepositoryDivergence { name: "proj".into() })
        );
        assert!(!roots.config.destination.join("proj/extra").exists());
    }

    #[test]
    fn test_kind_mismatch_is_acknowledged_only() {
        let roots = roots(false);
        write(&roots.config.source.join("x"), "file", 1_600_000_000);
        fs::create_dir(roots.config.destination.join("x")).expect("create folder");

        let (result, operator) = run(&roots.config, &SkipLists::default(), &["a"]);
        result.expect("run");

        assert_eq!(
            operator.requests().next(),
            Some(&DecisionRequest::KindMismatch {
                name: "x".into(),
                source: EntryKind::File,
                destination: EntryKind::Folder,
            })
        );
        assert!(roots.config.destination.join("x").is_dir());
    }

    #[test]
    fn test_quit_stops_the_run() {
        let roots = roots(false);
        for name in ["a.txt", "b.txt"] {
            write(&roots.config.source.join(name), "new", 1_600_000_100);
            write(&roots.config.destination.join(name), "old", 1_600_000_000);
        }

        let (result, operator) = run(&roots.config, &SkipLists::default(), &["q", "y"]);

        assert!(matches!(result, Err(RekonError::Quit)));
        assert_eq!(operator.requests().count(), 1);
        for name in ["a.txt", "b.txt"] {
            assert_eq!(
                fs::read_to_string(roots.config.destination.join(name)).expect("read dst"),
                "old"
            );
        }
    }

    #[test]
    fn test_invalid_input_is_asked_again() {
        let roots = roots(false);
        write(&roots.config.source.join("new.txt"), "x", 1_600_000_000);

        let (result, operator) = run(&roots.config, &SkipLists::default(), &["maybe", "Y", "y"]);
        result.expect("run");

        assert_eq!(operator.requests().count(), 3);
        assert!(roots.config.destination.join("new.txt").exists());
    }

    #[test]
    fn test_context_depth_follows_nesting() {
        let roots = roots(false);
        write(&roots.config.source.join("a/b/c.txt"), "x", 1_600_000_000);
        write(&roots.config.destination.join("a/b/c.txt"), "x", 1_600_000_000);

        let (result, operator) = run(&roots.config, &SkipLists::default(), &[]);
        let stats = result.expect("run");

        let entered: Vec<_> = operator
            .transcript()
            .iter()
            .filter_map(|record| match record {
                Record::Shown {
                    depth,
                    event: Event::Enter { name },
                } => Some((*depth, name.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(entered, vec![(1, "[root]"), (2, "a"), (3, "b"), (4, "c.txt")]);
        assert_eq!(stats.in_sync, 1);
        assert_eq!(stats.directories, 3);
    }

    fn populate(config: &Config) {
        write(&config.source.join("new.txt"), "fresh", 1_600_000_000);
        write(&config.source.join("docs/a.md"), "updated", 1_600_000_100);
        write(&config.destination.join("docs/a.md"), "old", 1_600_000_000);
        write(&config.destination.join("stale.log"), "log", 1_600_000_000);
        write(&config.source.join("same.txt"), "same", 1_600_000_000);
        write(&config.destination.join("same.txt"), "same", 1_600_000_000);
    }

    fn snapshot(root: &Path) -> Vec<(String, Vec<u8>)> {
        let mut files = Vec::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir).expect("read dir") {
                let path = entry.expect("dir entry").path();
                if path.is_dir() {
                    pending.push(path);
                } else {
                    let relative = path
                        .strip_prefix(root)
                        .expect("under root")
                        .to_string_lossy()
                        .into_owned();
                    files.push((relative, fs::read(&path).expect("read file")));
                }
            }
        }
        files.sort();
        files
    }

    #[test]
    fn test_dry_run_matches_real_run() {
        let answers = ["y", "a", "y"];

        let real = roots(false);
        populate(&real.config);
        let (real_result, real_operator) = run(&real.config, &SkipLists::default(), &answers);
        real_result.expect("real run");

        let dry = roots(true);
        populate(&dry.config);
        let before = snapshot(&dry.config.destination);
        let (dry_result, dry_operator) = run(&dry.config, &SkipLists::default(), &answers);
        let dry_stats = dry_result.expect("dry run");

        assert_eq!(real_operator.transcript(), dry_operator.transcript());
        assert_eq!(snapshot(&dry.config.destination), before);
        assert_eq!(dry_stats.copied, 1);
        assert_eq!(dry_stats.replaced, 1);
        assert_eq!(dry_stats.bytes_copied, 0);
    }
}
