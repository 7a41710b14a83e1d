// firmware/build.rs
use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds (library tests) link normally; only the R5F image gets the memory map.
    let target = env::var("TARGET").unwrap_or_default();
    if !target.starts_with("armv7r") {
        return;
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let script = manifest_dir.join("memory.ld");
    println!("cargo:rerun-if-changed={}", script.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-T{}", script.display());
    println!("cargo:rustc-link-arg-bins=-Map=firmware.map");
}
