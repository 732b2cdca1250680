//! studio init command implementation
//!
//! Creates the default config and the `.studio/` board storage.

use std::path::{Path, PathBuf};

use crate::cli::Studio;
use crate::config::{Config, CONFIG_FILE};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::storage::LOCAL_DIR;

#[derive(serde::Serialize)]
struct InitReport {
    root: PathBuf,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    config: bool,
    storage: bool,
}

pub fn run(studio: &Studio) -> Result<()> {
    let root = studio.storage.root().to_path_buf();
    let created_config = ensure_config(&root)?;
    let created_storage = studio.storage.init()?;

    let report = InitReport {
        root: root.clone(),
        created: InitCreated {
            config: created_config,
            storage: created_storage,
        },
    };

    let mut created_items = Vec::new();
    if created_config {
        created_items.push(CONFIG_FILE.to_string());
    }
    if created_storage {
        created_items.push(format!("{LOCAL_DIR}/"));
    }

    let header = if created_items.is_empty() {
        "studio init: nothing to do"
    } else {
        "studio init: initialized studio"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("root", root.display().to_string());
    human.push_summary(
        "created",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );

    emit_success(studio.output, "init", &report, Some(&human))
}

fn ensure_config(root: &Path) -> Result<bool> {
    let path = root.join(CONFIG_FILE);
    if path.exists() {
        return Ok(false);
    }
    std::fs::create_dir_all(root)?;
    Config::default().save(&path)?;
    Ok(true)
}
