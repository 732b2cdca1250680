#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestStudio {
    dir: TempDir,
}

impl TestStudio {
    /// Empty root, not initialized.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Root with `studio init` already run.
    pub fn init() -> Result<Self, Box<dyn std::error::Error>> {
        let studio = Self::new()?;
        studio.cmd().arg("init").assert().success();
        Ok(studio)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = studio_cmd();
        cmd.current_dir(self.path());
        cmd.env_remove("STUDIO_ROOT");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        self.write_file(".studio.toml", contents)
    }

    pub fn board_file(&self) -> PathBuf {
        self.dir.path().join(".studio").join("board.json")
    }

    /// Run with `--json` and return the parsed envelope.
    pub fn json(&self, args: &[&str]) -> Result<Value, Box<dyn std::error::Error>> {
        let output = self.cmd().arg("--json").args(args).output()?;
        if !output.status.success() {
            return Err(format!(
                "studio {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stdout)
            )
            .into());
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    /// Create a task and return its id.
    pub fn new_task(&self, args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
        let mut full = vec!["task", "new"];
        full.extend_from_slice(args);
        let value = self.json(&full)?;
        let id = value["data"]["id"]
            .as_str()
            .ok_or("missing task id")?
            .to_string();
        Ok(id)
    }
}

pub fn studio_cmd() -> Command {
    Command::cargo_bin("studio").expect("studio binary")
}
