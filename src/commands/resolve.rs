//! `targetscope resolve` command.

use std::path::PathBuf;

use crate::changes::ChangeSource;
use crate::context::ServiceContext;
use crate::error::Result;
use crate::matcher::UnitMatcher;
use crate::metadata::ProjectMetadata;
use crate::report::TargetReport;
use crate::resolver;

/// Inputs of one resolution run.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Where the changed files come from.
    pub source: ChangeSource,
    /// Path of `project.json`.
    pub metadata_path: PathBuf,
    /// Where the JSON result is written.
    pub output_file: PathBuf,
    /// Repository root unit directories are resolved against.
    pub root: PathBuf,
    /// Whether to include the `name:version` matrix.
    pub matrix: bool,
}

/// Runs the whole pipeline against the ports in `ctx` and writes the result.
///
/// Nothing is written if any stage fails.
///
/// # Errors
///
/// Returns the first configuration or environment error encountered.
pub fn run_with_context(ctx: &ServiceContext, opts: &ResolveOptions) -> Result<TargetReport> {
    tracing::info!(metadata = %opts.metadata_path.display(), "start resolving build targets");

    let project = ProjectMetadata::load(ctx.fs.as_ref(), &opts.metadata_path)?;
    let files = opts.source.changed_files(ctx.git.as_ref(), ctx.fs.as_ref())?;
    let matcher = UnitMatcher::build(&project, ctx.fs.as_ref(), &opts.root)?;
    let changed = matcher.changed_units(&files)?;
    let resolution = resolver::resolve(&changed, &project);
    if resolution.is_empty() {
        tracing::info!(files = files.len(), "no unit affected, nothing to build");
    } else {
        tracing::info!(
            products = ?resolution.products,
            infra = ?resolution.infra,
            "resolved build targets"
        );
    }

    let report = TargetReport::load(&resolution, &project, &matcher, ctx.fs.as_ref(), &opts.root)?;
    report.write(ctx.fs.as_ref(), &opts.output_file, opts.matrix)?;
    Ok(report)
}

/// Execute the `resolve` command and print a per-tier summary.
///
/// # Errors
///
/// See [`run_with_context`].
pub fn run(ctx: &ServiceContext, opts: &ResolveOptions) -> Result<()> {
    let report = run_with_context(ctx, opts)?;
    println!("{}", report.summary());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ports::RevisionRange;
    use crate::testing::{FakeGit, MemFs};

    const PROJECT: &str = r#"{
        "infra_priority": {"base": 1, "python": 2, "node": 3},
        "products_priority": {"api": 2, "web": 1},
        "global_path": ["Makefile"]
    }"#;

    fn repo() -> MemFs {
        let meta = |name: &str| format!(r#"{{"name": "{name}", "properties": [{{"version": "1"}}]}}"#);
        MemFs::new()
            .with_file("project.json", PROJECT)
            .with_file("base/metadata.json", &meta("base"))
            .with_file("python/metadata.json", &meta("python"))
            .with_file("node/metadata.json", &meta("node"))
            .with_file("api/metadata.json", &meta("api"))
            .with_file("web/metadata.json", &meta("web"))
    }

    fn opts(source: ChangeSource) -> ResolveOptions {
        ResolveOptions {
            source,
            metadata_path: PathBuf::from("project.json"),
            output_file: PathBuf::from("output.json"),
            root: PathBuf::from("."),
            matrix: false,
        }
    }

    fn context(fs: MemFs, git: FakeGit) -> ServiceContext {
        ServiceContext { fs: Box::new(fs), git: Box::new(git) }
    }

    fn output(ctx: &ServiceContext) -> serde_json::Value {
        let raw = ctx.fs.read_to_string(std::path::Path::new("output.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn python_change_escalates() {
        let ctx = context(repo(), FakeGit::with_diff("python/Dockerfile\nREADME.md\n"));
        let source = ChangeSource::Git(Some(RevisionRange { before: "a".into(), after: "b".into() }));

        let report = run_with_context(&ctx, &opts(source)).unwrap();
        assert_eq!(report.infra_names().collect::<Vec<_>>(), vec!["python", "node"]);
        assert_eq!(output(&ctx), serde_json::json!({"products": ["web", "api"], "infra": ["python", "node"]}));
    }

    #[test]
    fn no_changes_writes_empty_lists() {
        let ctx = context(repo(), FakeGit::with_diff(""));
        run_with_context(&ctx, &opts(ChangeSource::Git(None))).unwrap();
        assert_eq!(output(&ctx), serde_json::json!({"products": [], "infra": []}));
    }

    #[test]
    fn global_change_builds_everything() {
        let ctx = context(repo(), FakeGit::with_diff("Makefile\n"));
        run_with_context(&ctx, &opts(ChangeSource::Git(None))).unwrap();
        assert_eq!(
            output(&ctx),
            serde_json::json!({"products": ["web", "api"], "infra": ["base", "python", "node"]})
        );
    }

    #[test]
    fn changed_files_list_replaces_git() {
        let fs = repo().with_file("changes.txt", "api/main.go\n");
        let ctx = context(fs, FakeGit::failing("git must not run"));
        run_with_context(&ctx, &opts(ChangeSource::File(PathBuf::from("changes.txt")))).unwrap();
        assert_eq!(output(&ctx), serde_json::json!({"products": ["api"], "infra": []}));
    }

    #[test]
    fn ambiguous_owner_writes_nothing() {
        let fs = MemFs::new()
            .with_file("project.json", r#"{"infra_priority": {"base": 1}, "products_priority": {"base/alpine": 1}}"#)
            .with_dir("base")
            .with_dir("base/alpine");
        let ctx = context(fs, FakeGit::with_diff("base/alpine/Dockerfile\n"));

        let err = run_with_context(&ctx, &opts(ChangeSource::Git(None))).unwrap_err();
        assert!(matches!(err, Error::AmbiguousOwner { .. }));
        assert!(!ctx.fs.exists(std::path::Path::new("output.json")));
    }

    #[test]
    fn git_failure_writes_nothing() {
        let ctx = context(repo(), FakeGit::failing("fatal: bad object"));
        let err = run_with_context(&ctx, &opts(ChangeSource::Git(None))).unwrap_err();
        assert!(matches!(err, Error::Diff(_)));
        assert!(!ctx.fs.exists(std::path::Path::new("output.json")));
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let run_once = || {
            let ctx = context(repo(), FakeGit::with_diff("web/x\nbase/y\napi/z\n"));
            let mut o = opts(ChangeSource::Git(None));
            o.matrix = true;
            run_with_context(&ctx, &o).unwrap();
            ctx.fs.read_to_string(std::path::Path::new("output.json")).unwrap()
        };
        assert_eq!(run_once(), run_once());
    }
}
