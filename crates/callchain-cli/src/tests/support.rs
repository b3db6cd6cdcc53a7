//! Test support utilities for CLI coverage.
//!
//! Supplies a fixed configuration loader and a world that captures CLI
//! output so step definitions and unit tests stay focused on assertions.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use callchain_config::Config;
use callchain_graph::CancellationToken;
use camino::Utf8PathBuf;
use rstest::fixture;
use tempfile::TempDir;

use crate::{AppError, ConfigLoader, IoStreams, run_with_loader};

pub(super) const FOO: &str = "Foo.bar()  (com.example)";
pub(super) const BAZ: &str = "Baz.qux()  (com.example)";
pub(super) const MAIN: &str = "Main.main(String[])  (com.example)";

/// A config loader that returns a fixed configuration for tests.
pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Test world holding CLI state and captured output.
pub(super) struct TestWorld {
    pub temp_dir: TempDir,
    pub config: Config,
    pub cancel: CancellationToken,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
}

impl TestWorld {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("create temp dir")?;
        let output_dir = Utf8PathBuf::from_path_buf(temp_dir.path().join("graphs"))
            .map_err(|path| anyhow::anyhow!("non UTF-8 temp path {}", path.display()))?;
        let config = Config {
            output_dir,
            ..Config::default()
        };
        Ok(Self {
            temp_dir,
            config,
            cancel: CancellationToken::new(),
            stdout: Vec::new(),
            stderr: Vec::new(),
            exit_code: None,
        })
    }

    pub fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).with_context(|| format!("write {name}"))?;
        Ok(path)
    }

    pub fn write_call_map(&self) -> Result<PathBuf> {
        let json = serde_json::json!({
            "callers": {
                FOO: [BAZ],
                BAZ: [MAIN, FOO],
            },
            "origins": {
                BAZ: "production",
                MAIN: "test",
            }
        });
        self.write_file("calls.json", &json.to_string())
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.config.output_dir().as_std_path().join(format!("{name}.json"))
    }

    pub fn run<I>(&mut self, args: I)
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut argv = vec![OsString::from("callchain")];
        argv.extend(args);
        let loader = StaticConfigLoader::new(self.config.clone());
        let mut io = IoStreams::new(&mut self.stdout, &mut self.stderr);
        self.exit_code = Some(run_with_loader(argv, &mut io, &loader, self.cancel.clone()));
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

pub(super) fn read_graph(path: &Path) -> Result<serde_json::Value> {
    let json = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&json).context("parse graph json")
}

#[fixture]
pub(super) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new().expect("test world"))
}
