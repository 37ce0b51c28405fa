//! External LaTeX compilers.
//!
//! A backend is one program invocation. The chain in `compile::chain` owns the
//! workspace, enforces the time limit and checks for output; a backend only has
//! to run to completion and report how it exited.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Why a single compiler attempt produced no PDF.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error("could not start: {0}")]
    Spawn(String),

    #[error("exited with {}", .0.map(|c| format!("code {c}")).unwrap_or_else(|| "a signal".to_string()))]
    Exit(Option<i32>),

    #[error("timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("exited cleanly but produced no PDF")]
    NoOutput,
}

#[async_trait]
pub trait CompilerBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Wall clock limit for one attempt.
    fn timeout(&self) -> Duration;

    /// Compiles `tex_path` so that `main.pdf` lands in `workdir`.
    /// Dropping the returned future must stop the work.
    async fn compile(&self, workdir: &Path, tex_path: &Path) -> Result<(), AttemptError>;
}

/// Placeholders substituted in `ProcessCompiler` arguments.
const DIR_PLACEHOLDER: &str = "{dir}";
const TEX_PLACEHOLDER: &str = "{tex}";

/// Runs an external program with templated arguments.
#[derive(Debug, Clone)]
pub struct ProcessCompiler {
    program: String,
    args: Vec<String>,
    run_in_workdir: bool,
    timeout: Duration,
}

impl ProcessCompiler {
    /// `args` may contain `{dir}` (the workspace) and `{tex}` (the source path).
    pub fn new(program: &str, args: &[&str], timeout: Duration) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            run_in_workdir: false,
            timeout,
        }
    }

    /// Runs the program with the workspace as its current directory.
    pub fn in_workdir(mut self) -> Self {
        self.run_in_workdir = true;
        self
    }

    fn resolved_args(&self, workdir: &Path, tex_path: &Path) -> Vec<String> {
        let dir = workdir.to_string_lossy();
        let tex = tex_path.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replace(DIR_PLACEHOLDER, &dir).replace(TEX_PLACEHOLDER, &tex))
            .collect()
    }
}

#[async_trait]
impl CompilerBackend for ProcessCompiler {
    fn name(&self) -> &str {
        &self.program
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn compile(&self, workdir: &Path, tex_path: &Path) -> Result<(), AttemptError> {
        let mut command = Command::new(&self.program);
        command
            .args(self.resolved_args(workdir, tex_path))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true);
        if self.run_in_workdir {
            command.current_dir(workdir);
        }

        let status = command
            .status()
            .await
            .map_err(|e| AttemptError::Spawn(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(AttemptError::Exit(status.code()))
        }
    }
}

/// `pdflatex` first, then `tectonic`.
pub fn default_chain(primary_timeout: Duration, secondary_timeout: Duration) -> Vec<Arc<dyn CompilerBackend>> {
    vec![
        Arc::new(ProcessCompiler::new(
            "pdflatex",
            &[
                "-interaction=nonstopmode",
                "-halt-on-error",
                "-output-directory",
                DIR_PLACEHOLDER,
                TEX_PLACEHOLDER,
            ],
            primary_timeout,
        )),
        Arc::new(ProcessCompiler::new("tectonic", &[TEX_PLACEHOLDER], secondary_timeout).in_workdir()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_chain_order_and_timeouts() {
        let chain = default_chain(Duration::from_secs(10), Duration::from_secs(15));
        let names: Vec<&str> = chain.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["pdflatex", "tectonic"]);
        assert_eq!(chain[0].timeout(), Duration::from_secs(10));
        assert_eq!(chain[1].timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_placeholders_resolve_to_workspace_paths() {
        let compiler = ProcessCompiler::new(
            "pdflatex",
            &["-output-directory", "{dir}", "{tex}"],
            Duration::from_secs(1),
        );
        let dir = PathBuf::from("/tmp/latex-x");
        let args = compiler.resolved_args(&dir, &dir.join("main.tex"));
        assert_eq!(args, vec!["-output-directory", "/tmp/latex-x", "/tmp/latex-x/main.tex"]);
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = ProcessCompiler::new(
            "tailor-no-such-compiler-binary",
            &["{tex}"],
            Duration::from_secs(1),
        );
        let err = compiler
            .compile(dir.path(), &dir.path().join("main.tex"))
            .await
            .unwrap_err();
        assert!(matches!(err, AttemptError::Spawn(_)), "got {err:?}");
    }

    #[test]
    fn test_attempt_error_messages() {
        assert_eq!(AttemptError::Exit(Some(1)).to_string(), "exited with code 1");
        assert_eq!(AttemptError::Exit(None).to_string(), "exited with a signal");
        assert_eq!(
            AttemptError::TimedOut(Duration::from_secs(10)).to_string(),
            "timed out after 10s"
        );
    }
}
