//! Build-script helper that runs diffbind generation for one unit.
//!
//! The argument is the declarations file, relative to the package root.
//! `diffbind.toml` is read from the package root when present.
#[macro_export]
macro_rules! build {
    ($declarations:expr) => {
        use std::{env::var, path::PathBuf};

        //
        // CARGO
        //

        println!("cargo:rerun-if-changed=build.rs");
        println!("cargo:rerun-if-changed={}", $declarations);
        println!(
            "cargo:rerun-if-changed={}",
            ::diffbind::build::config::CONFIG_FILE
        );
        println!(
            "cargo:rerun-if-env-changed={}",
            ::diffbind::build::config::ENV_UNIT
        );
        println!(
            "cargo:rerun-if-env-changed={}",
            ::diffbind::build::config::ENV_SNAPSHOT_DIR
        );

        let out_dir = PathBuf::from(var("OUT_DIR")?);
        let manifest_dir = PathBuf::from(var("CARGO_MANIFEST_DIR")?);

        //
        // GENERATED CODE
        //

        ::diffbind::build::run(
            &manifest_dir.join(::diffbind::build::config::CONFIG_FILE),
            &manifest_dir.join($declarations),
            &out_dir,
        )?
        .strict()?;
    };
}
