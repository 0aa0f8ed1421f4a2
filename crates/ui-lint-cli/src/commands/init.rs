//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# ui-lint configuration

# recommended | strict | minimal
preset = "recommended"

# Lowest severity that fails `ui-lint check`: error | warning | suggestion
fail_on = "error"

[analyzer]
# Glob patterns to exclude, on top of node_modules, build output and
# generated directories
exclude = [
    "**/generated/**",
]

# Extra ignore file, one glob per line
ignore_file = ".uilintignore"

# Respect .gitignore files
respect_gitignore = true

[conventions]
source_root = "src"
required_dirs = ["components", "hooks", "lib"]
max_depth = 2
max_class_length = 50
merge_helpers = ["cn", "clsx", "twMerge", "classNames", "cva"]
merge_helper_import = "@/lib/utils"
barrel_dirs = ["components", "hooks", "lib", "utils"]

[heal]
# max_fix = 25
# areas = ["typing", "directive"]
reconcile_barrels = true
scaffold_tests = false

# Each rule can be enabled/disabled and have its severity overridden

[rules.client-directive]
enabled = true

# [rules.long-class-list]
# severity = "suggestion"
# max_length = 60
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("ui-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created ui-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit ui-lint.toml to match your project layout");
    println!("  2. Run: ui-lint check");
    println!("  3. Run: ui-lint heal --dry-run");

    Ok(())
}
