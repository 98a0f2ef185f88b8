//! `validate` command - check a calibration profile file

use anyhow::Result;
use profile_store::ProfileStore;
use serde_json::json;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::CliError;

/// Validate a calibration profile file
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    if !args.profile.exists() {
        return Err(CliError::profile_not_found(args.profile.display().to_string()).into());
    }

    match ProfileStore::load(&args.profile) {
        Ok(profile) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "valid": true,
                        "path": args.profile.display().to_string(),
                        "version": format!("{:?}", profile.version()),
                    }))?
                );
            } else {
                println!("✓ Profile is valid: {}", args.profile.display());
            }
            info!(path = %args.profile.display(), "profile validated");
            Ok(())
        }
        Err(e) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "valid": false,
                        "path": args.profile.display().to_string(),
                        "error": e.to_string(),
                    }))?
                );
            } else {
                println!("✗ Profile is invalid: {e}");
            }
            Err(CliError::profile_load(e.to_string()).into())
        }
    }
}
