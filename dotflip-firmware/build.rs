//! Build script for dotflip-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Parses and validates display.toml at compile time
//! - Embeds the validated configuration as postcard bytes

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use dotflip_core::DisplayConfig;

/// Upper bound for the encoded configuration
const CONFIG_BUF_LEN: usize = 1024;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    setup_linker(&out_dir);
    embed_config(&out_dir);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate display.toml and write it to `OUT_DIR/display.bin`
fn embed_config(out_dir: &Path) {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a display.toml configuration file.        ║\n\
            ║  Please create one in the dotflip-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read display.toml", &e.to_string()),
    };

    let config: DisplayConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => fail("Invalid display.toml", &e.to_string()),
    };

    if let Err(e) = config.validate() {
        fail("display.toml failed validation", &format!("{:?}", e));
    }

    let mut buf = [0u8; CONFIG_BUF_LEN];
    let bytes = match config.to_postcard(&mut buf) {
        Ok(bytes) => bytes,
        Err(e) => fail("Failed to encode display configuration", &format!("{:?}", e)),
    };
    fs::write(out_dir.join("display.bin"), &*bytes).unwrap();

    println!(
        "cargo:warning=display.toml validated: {} rows, {} modules, {} dots",
        config.row_count(),
        config.module_count(),
        config.dot_count()
    );
}

/// Abort the build with a boxed error message
fn fail(title: &str, detail: &str) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(detail)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
