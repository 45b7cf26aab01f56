//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `imagehost_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use std::process::ExitCode;

fn main() -> ExitCode {
    println!("imagehost_core version={}", imagehost_core::core_version());

    match imagehost_core::db::open_db_in_memory() {
        Ok(_conn) => {
            println!(
                "imagehost_core schema_version={}",
                imagehost_core::db::migrations::latest_version()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("database bootstrap failed: {err}");
            ExitCode::FAILURE
        }
    }
}
