//! `flagprobe toolchain` command

use anyhow::Result;

use crate::cli::GlobalArgs;
use flagprobe::builder::toolchain::detect_toolchain;
use flagprobe::core::family::CompilerFamily;
use flagprobe::core::language::Language;
use flagprobe::core::platform::{DestOs, TargetTriple};
use flagprobe::util::config::load_toolchain_config_for;
use flagprobe::util::process::ProcessBuilder;

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let root = global.project_root()?;
    let config = load_toolchain_config_for(&root);
    let toolchain = detect_toolchain(&config)?;
    let settings = &config.toolchain;

    println!("Toolchain: {}", toolchain.platform().as_str());
    println!();

    for language in Language::ALL {
        let driver = toolchain.driver(language);
        let id = match language {
            Language::C => settings.cc_id.as_deref(),
            Language::Cxx => settings.cxx_id.as_deref(),
        }
        .unwrap_or(toolchain.platform().as_str());

        println!("  {:<4} {}", language.as_str(), driver.display());
        println!(
            "       id: {} ({})",
            id,
            CompilerFamily::classify(id)
        );

        // First line of --version, if the driver answers
        if let Ok(output) = ProcessBuilder::new(driver).arg("--version").exec() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if let Some(first_line) = stdout.lines().next() {
                println!("       {}", first_line.trim());
            }
        }
    }

    println!();

    // Target
    let target = settings
        .target
        .as_deref()
        .and_then(TargetTriple::parse)
        .unwrap_or_else(TargetTriple::host);
    println!("  Target: {}", target);
    println!("    OS:   {}", DestOs::from_triple(&target));

    println!();

    // Environment variables
    println!("Environment:");
    for var in ["CC", "CXX", "PTHREAD_CFLAGS", "PTHREAD_LIBS"] {
        if let Ok(value) = std::env::var(var) {
            println!("  {}={}", var, value);
        }
    }

    Ok(())
}
