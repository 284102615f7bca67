//! CLI implementation for `cdiml clean` command
//!
//! This module handles the CLI interface for removing provisioned
//! artifacts.

use std::path::Path;

use anyhow::Result;

use crate::cli::output::{is_json, print_detail, print_success};
use crate::core::clean::{clean_workspace, format_size, has_artifacts};

/// Execute the clean command
pub async fn execute(workspace: &Path, env_only: bool) -> Result<()> {
    if !has_artifacts(workspace) {
        if is_json() {
            println!("{}", serde_json::json!({"status": "success", "removed": []}));
        } else {
            print_success("Nothing to clean");
        }
        return Ok(());
    }

    let result = clean_workspace(workspace, env_only)?;

    if is_json() {
        let json_result = serde_json::json!({
            "status": "success",
            "removed": result.removed.iter().map(|r| serde_json::json!({
                "label": r.label,
                "path": r.path,
                "bytes": r.bytes,
            })).collect::<Vec<_>>(),
            "skipped": result.skipped,
        });
        println!("{}", serde_json::to_string_pretty(&json_result).unwrap_or_default());
        return Ok(());
    }

    if result.removed.is_empty() {
        print_success("Nothing to clean");
    } else {
        print_success("Cleaned provisioned artifacts:");
        for artifact in &result.removed {
            print_detail(&format!(
                "Removed {} ({})",
                artifact.label,
                format_size(artifact.bytes)
            ));
        }
        for skipped in &result.skipped {
            print_detail(&format!("Skipped {skipped} (not present)"));
        }
    }

    Ok(())
}
