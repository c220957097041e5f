//! Running the demangler under a resource-usage wrapper

use super::BenchConfig;
use crate::{Error, Result};
use log::{debug, warn};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

/// Something that consumes a payload and reports resource usage on stderr
///
/// Implementations can wrap:
/// - A real process under `time` (see [`TimedCommand`])
/// - Canned reports for testing
pub trait Runner {
    /// Feed `input` on stdin and return the captured stderr
    fn run(&self, input: &[u8]) -> Result<String>;
}

/// `<time_bin> <time_args..> <program> <program_args..>` with piped stdio
#[derive(Clone, Debug)]
pub struct TimedCommand {
    pub time_bin: PathBuf,
    pub time_args: Vec<String>,
    pub program: PathBuf,
    pub program_args: Vec<String>,
}

impl TimedCommand {
    pub fn from_config(config: &BenchConfig) -> Self {
        TimedCommand {
            time_bin: config.time_bin.clone(),
            time_args: config.time_args.clone(),
            program: config.demangler.clone(),
            program_args: config.demangler_args.clone(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.time_bin);
        cmd.args(&self.time_args)
            .arg(&self.program)
            .args(&self.program_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Runner for TimedCommand {
    fn run(&self, input: &[u8]) -> Result<String> {
        let mut child = self.command().spawn()?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "child stdin not captured"))?;

        // Write on a separate thread; the child may fill its output pipes
        // before it has read all of a large payload.
        let output = thread::scope(|scope| -> Result<std::process::Output> {
            let writer = scope.spawn(move || stdin.write_all(input));
            let output = child.wait_with_output()?;
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("{} closed stdin early", self.program.display());
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::Other,
                        "stdin writer thread panicked",
                    )))
                }
            }
            Ok(output)
        })?;

        if !output.status.success() {
            warn!("{} exited with {}", self.program.display(), output.status);
        }
        Ok(String::from_utf8_lossy(&output.stderr).into_owned())
    }
}
