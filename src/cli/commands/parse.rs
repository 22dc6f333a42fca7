//! CLI command for `rpmbatch parse`
//!
//! Shows what was extracted from each spec file, without any filtering.

use anyhow::{bail, Result};

use crate::cli::commands::{host_arch, load_descriptors, BatchArgs};
use crate::cli::output::{is_json, is_quiet, print_detail, status};
use crate::core::arch::check_eligible;
use crate::core::global_config::GlobalConfig;

/// Execute the parse command
pub async fn execute(config: &GlobalConfig, args: &BatchArgs) -> Result<()> {
    let arch = host_arch(config, args);
    let loaded = load_descriptors(config, args).await?;
    let failures = loaded.iter().filter(|(_, r)| r.is_err()).count();

    if is_json() {
        let entries: Vec<serde_json::Value> = loaded
            .iter()
            .map(|(path, parsed)| match parsed {
                Ok(d) => serde_json::json!({
                    "path": path,
                    "descriptor": d,
                    "eligible": check_eligible(d, &arch).is_ok(),
                }),
                Err(e) => serde_json::json!({
                    "path": path,
                    "error": e.to_string(),
                }),
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).unwrap_or_default()
        );
    } else if !is_quiet() {
        for (path, parsed) in &loaded {
            match parsed {
                Ok(d) => {
                    println!("{} {} ({})", status::SUCCESS, d.name, path.display());
                    print_detail(&format!("build root: {}", d.build_root.display()));
                    print_detail(&format!(
                        "build requires: {}",
                        d.build_dependencies.join(", ")
                    ));
                    if !d.exclude_arch.is_empty() {
                        print_detail(&format!("exclude arch: {}", join(&d.exclude_arch)));
                    }
                    if !d.exclusive_arch.is_empty() {
                        print_detail(&format!("exclusive arch: {}", join(&d.exclusive_arch)));
                    }
                    if let Err(e) = check_eligible(d, &arch) {
                        print_detail(&format!("{} {e}", status::WARNING));
                    }
                }
                Err(e) => println!("{} {}: {e}", status::ERROR, path.display()),
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} spec files could not be parsed", loaded.len());
    }
    Ok(())
}

fn join(set: &std::collections::BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join(", ")
}
