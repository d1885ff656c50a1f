//! This build script copies the `memory.x` file from the crate root into a directory where
//! the linker can always find it at build time, and records the build time as clock start.

use std::{env, fs::File, io::Write, path::PathBuf};

fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());

    // Put memory layout in the output directory and ensure it's on the linker search path.
    // Host builds of the library and its tests have no use for it.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("none") {
        File::create(out.join("memory.x"))
            .unwrap()
            .write_all(include_bytes!("memory.x"))
            .unwrap();
        println!("cargo:rustc-link-search={}", out.display());
    }

    // create rs file with current UTC time. No rerun-if-changed directive is
    // emitted, so the script runs again whenever any file of the package
    // changes and a fresh flash starts from a fresh epoch.
    File::create(out.join("utc.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "const UTC_TIME: i64 = {:?};",
            chrono::Utc::now().timestamp()
        ))
        .unwrap();
}
