use anyhow::Result;
use fs_extra::{copy_items, dir::CopyOptions};
use std::{env, path::PathBuf};

/// Bundle `assets/` into `OUT_DIR` so a binary run away from the source tree
/// still finds its models.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets = manifest_dir.join("assets");
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    if assets.is_dir() {
        let mut options = CopyOptions::new();
        options.overwrite = true;
        copy_items(&[assets], &out_dir, &options)?;
    } else {
        std::fs::create_dir_all(out_dir.join("assets"))?;
    }

    Ok(())
}
