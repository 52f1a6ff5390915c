//! External command execution utilities.
//!
//! Every external tool (CSS processor, JS bundler, linter, `git push`)
//! goes through the same entry point so output handling and error
//! reporting stay uniform.

use crate::log;
use anyhow::{Context, Result, bail};
use std::{
    ffi::{OsStr, OsString},
    path::Path,
    process::{Command, Output},
};

/// Run an external command with arguments in a working directory.
///
/// The command slice carries the program plus its configured base
/// arguments (as stored in config); trailing arguments are appended.
///
/// # Examples
/// ```ignore
/// exec!(root; &["git"]; "push", "origin", refspec)?;
/// exec!(root; &config.build.js.bundle_command; &entry, "--bundle")?;
/// ```
#[macro_export]
macro_rules! exec {
    ($root:expr; $cmd:expr; $($arg:expr),* $(,)?) => {
        $crate::utils::exec::run($root, $cmd, &[$($crate::utils::exec::to_os($arg)),*])
    };
}

/// Convert any os-string-like argument for the `exec!` macro.
pub fn to_os(arg: impl AsRef<OsStr>) -> OsString {
    arg.as_ref().to_os_string()
}

/// Run a command and fail on a non-zero exit status.
///
/// Empty arguments are dropped so callers can pass conditional flags
/// (e.g. a minify flag that is only set in production). On failure the
/// command's output is logged line by line before the error is returned.
pub fn run<S: AsRef<OsStr>>(root: &Path, cmd: &[S], args: &[OsString]) -> Result<Output> {
    let output = spawn(root, cmd, args)?;

    if !output.status.success() {
        let program = cmd[0].as_ref().to_string_lossy().into_owned();
        report(&program, &output);
        bail!("`{program}` exited with {}", output.status);
    }

    Ok(output)
}

/// Run a command without treating a non-zero exit status as an error.
///
/// Used by the lint task, which always reports diagnostics but decides
/// fatality itself based on the build environment.
pub fn run_unchecked<S: AsRef<OsStr>>(root: &Path, cmd: &[S], args: &[OsString]) -> Result<Output> {
    spawn(root, cmd, args)
}

fn spawn<S: AsRef<OsStr>>(root: &Path, cmd: &[S], args: &[OsString]) -> Result<Output> {
    let (program, base_args) = cmd.split_first().context("Command must not be empty")?;

    Command::new(program.as_ref())
        .args(base_args.iter().map(AsRef::as_ref))
        .args(args.iter().filter(|arg| !arg.is_empty()))
        .current_dir(root)
        .output()
        .with_context(|| {
            format!(
                "Failed to run `{}` in {}",
                program.as_ref().to_string_lossy(),
                root.display()
            )
        })
}

/// Log a failed command's stdout and stderr with its name as prefix.
fn report(program: &str, output: &Output) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    for line in stdout.lines().chain(stderr.lines()) {
        log!(program; "{line}");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cwd() -> PathBuf {
        std::env::current_dir().unwrap()
    }

    #[test]
    fn test_run_success() {
        let output = run(&cwd(), &["true"], &[]).unwrap();
        assert!(output.status.success());
    }

    #[test]
    fn test_run_failure() {
        let result = run(&cwd(), &["false"], &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_unchecked_failure_is_ok() {
        let output = run_unchecked(&cwd(), &["false"], &[]).unwrap();
        assert!(!output.status.success());
    }

    #[test]
    fn test_run_empty_command() {
        let empty: &[&str] = &[];
        assert!(run(&cwd(), empty, &[]).is_err());
    }

    #[test]
    fn test_empty_args_are_dropped() {
        // `echo` with a dropped empty flag prints only the real argument
        let output = run(&cwd(), &["echo"], &[to_os("hello"), to_os("")]).unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }

    #[test]
    fn test_base_args_are_kept() {
        let output = run(&cwd(), &["echo", "-n"], &[to_os("x")]).unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "x");
    }

    #[test]
    fn test_missing_program() {
        let result = run(&cwd(), &["definitely-not-a-real-program-xyz"], &[]);
        assert!(result.is_err());
    }
}
