//! The `visiotest init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    let path = Path::new("visiotest.toml");
    if path.exists() {
        println!("visiotest.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG)?;
        println!("Created visiotest.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit visiotest.toml to pick a record store");
    println!("  2. Run: visiotest run");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# visiotest configuration

# Highest level of each test.
max_level = 10

# Pause after a test finishes before returning to the menu.
completion_delay_ms = 2000

# Session snapshots and exports are written here.
output_dir = "./visiotest-results"

# Record store: "mock" logs and keeps nothing, "json" appends to local files.
[store]
type = "mock"

# [store]
# type = "json"
# dir = "${HOME}/.local/share/visiotest"
"#;
