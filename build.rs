// piezo-driver - Build Script
//
// Emits the version banner and the revision byte the boot beeps encode.

use std::process::Command;

fn main() {
    // ESP-IDF environment setup (MUST be first!)
    embuild::espidf::sysenv::output();

    let version = env!("CARGO_PKG_VERSION");
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!(
        "cargo:rustc-env=VERSION_STRING=piezo-driver v{}-g{}",
        version, git_hash
    );

    // Revision byte for the boot beeps: minor in the high base-4 digits,
    // patch in the low ones.
    let minor: u8 = env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0);
    let patch: u8 = env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0);
    println!(
        "cargo:rustc-env=FW_REV={}",
        minor.wrapping_mul(16).wrapping_add(patch)
    );

    // Rebuild if git HEAD changes
    println!("cargo:rerun-if-changed=.git/HEAD");
}
