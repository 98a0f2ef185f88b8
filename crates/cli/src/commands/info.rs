//! `info` command - display a calibration profile

use anyhow::{Context, Result};
use profile_store::ProfileStore;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Display calibration profile information
pub fn run_info(args: &InfoArgs) -> Result<()> {
    if !args.profile.exists() {
        return Err(CliError::profile_not_found(args.profile.display().to_string()).into());
    }

    let profile = ProfileStore::load(&args.profile)
        .with_context(|| format!("Failed to load {}", args.profile.display()))?;

    if args.json {
        println!("{}", ProfileStore::to_json(&profile)?);
        return Ok(());
    }

    let (canvas_w, canvas_h) = profile.canvas_size();
    let (box_w, box_h) = profile.box_size();
    let (z_min, z_max) = profile.z_range();

    println!("Calibration profile: {}", args.profile.display());
    println!("   ├─ Version: {:?}", profile.version());
    println!("   ├─ Rotation: {}°", profile.rot_angle());
    println!(
        "   ├─ Crop: x {:?}, y {:?}",
        profile.x_lim(),
        profile.y_lim()
    );
    println!(
        "   ├─ Placement: ({}, {}) at scale {}",
        profile.x_pos(),
        profile.y_pos(),
        profile.scale_factor()
    );
    println!("   ├─ Depth window: [{z_min}, {z_max}] mm");
    println!("   ├─ Canvas: {canvas_w}x{canvas_h}px");
    println!("   ├─ Sandbox: {box_w}mm x {box_h}mm");
    println!(
        "   ├─ Appearance: cmap {:?}, contours {} (n={})",
        profile.cmap(),
        profile.contours(),
        profile.n_contours()
    );
    println!(
        "   └─ Overlays: legend {}, profile {}, hot {}",
        profile.legend().is_some(),
        profile.profile_area().is_some(),
        profile.hot_area().is_some()
    );

    Ok(())
}
