//! Command dispatch and handlers.

pub mod check;
pub mod resolve;

use std::env;
use std::path::Path;

use crate::adapters::live::LiveGitRepo;
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::changes::ChangeSource;
use crate::cli::Command;
use crate::context::ServiceContext;
use crate::error::{Error, Result};

/// Env var naming a directory to record every port interaction into.
pub const RECORD_ENV: &str = "TARGETSCOPE_RECORD";
/// Env var naming a recorded session directory to replay instead of
/// touching the filesystem and git.
pub const REPLAY_ENV: &str = "TARGETSCOPE_REPLAY";

/// Dispatch a parsed command to its handler.
///
/// When `TARGETSCOPE_REPLAY` is set, ports are served from the cassettes in
/// that directory. Otherwise, when `TARGETSCOPE_RECORD` is set, all port
/// interactions are recorded to per-port cassette files beneath it.
///
/// # Errors
///
/// Returns the error of the selected command handler, or a cassette error
/// if recording or replaying cannot be set up.
pub fn dispatch(command: &Command) -> Result<()> {
    let root = command.project().root.as_path();

    if let Some(dir) = env_dir(REPLAY_ENV) {
        tracing::info!(dir = %dir, "replaying recorded session");
        let config = CassetteConfig::from_dir(Path::new(&dir)).map_err(Error::Cassette)?;
        let ctx = ServiceContext::replaying_from(&config)?;
        return dispatch_with_context(command, &ctx);
    }

    let Some(dir) = env_dir(RECORD_ENV) else {
        return dispatch_with_context(command, &ServiceContext::live(root));
    };

    let session =
        RecordingSession::new(Path::new(&dir), &LiveGitRepo::new(root)).map_err(Error::Cassette)?;
    let ctx = ServiceContext::recording(root, &session);
    let result = dispatch_with_context(command, &ctx);

    // Adapters hold the recorders; release them before finishing.
    drop(ctx);
    finish_recording(session)?;

    result
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<()> {
    match command {
        Command::Resolve { before_sha, after_sha, project, output_file, changed_files, matrix } => {
            let source = match changed_files {
                Some(path) => ChangeSource::File(path.clone()),
                None => ChangeSource::from_revisions(before_sha.as_deref(), after_sha.as_deref()),
            };
            let opts = resolve::ResolveOptions {
                source,
                metadata_path: project.metadata_path.clone(),
                output_file: output_file.clone(),
                root: project.root.clone(),
                matrix: *matrix,
            };
            resolve::run(ctx, &opts)
        }
        Command::Check { project } => check::run(ctx, &project.metadata_path, &project.root),
    }
}

fn env_dir(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<()> {
    let output_dir = session.finish().map_err(Error::Cassette)?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
