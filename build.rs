//! Collects the Git revision and build settings so that the binary can report
//! exactly what it was built from. The optimization level and whether debug
//! assertions are compiled in go into `settings` in the output directory: the
//! board and the rollouts check their move invariants only with debug
//! assertions on, and search speed depends on the optimization level.

use std::path::Path;
use std::{env, fs};

fn write_out_file(filename: &str, contents: &str) {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    fs::write(Path::new(&out_dir).join(filename), contents).unwrap();
}

fn build_settings() -> String {
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let opt_level = env::var("OPT_LEVEL").unwrap_or_else(|_| "?".to_string());
    let debug_assertions = if env::var_os("CARGO_CFG_DEBUG_ASSERTIONS").is_some() {
        "on"
    } else {
        "off"
    };
    format!("profile {profile}, opt-level {opt_level}, debug assertions {debug_assertions}")
}

fn main() -> shadow_rs::SdResult<()> {
    write_out_file("settings", &build_settings());
    shadow_rs::new()
}
