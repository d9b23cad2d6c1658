use std::collections::BTreeMap;

use anyhow::Context;
use serde::Deserialize;

/// Crates each workspace member must not depend on (normal dependencies).
const RULES: &[(&str, &[&str])] = &[
    (
        "emberhold-domain",
        &[
            "emberhold-engine",
            "emberhold-shared",
            "tokio",
            "async-trait",
            "dashmap",
            "dotenvy",
            "tracing-subscriber",
            "tempfile",
        ],
    ),
    (
        "emberhold-shared",
        &["emberhold-domain", "emberhold-engine", "tokio", "dashmap"],
    ),
];

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    /// `None` for normal dependencies, `"dev"` or `"build"` otherwise.
    kind: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!(
            "cargo metadata failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;
    let violations = check(&metadata);

    if violations.is_empty() {
        println!("arch-check: ok ({} packages)", metadata.packages.len());
        return Ok(());
    }

    for (package, forbidden) in &violations {
        eprintln!("arch-check: {package} must not depend on {}", forbidden.join(", "));
    }
    anyhow::bail!("arch-check failed for {} package(s)", violations.len())
}

fn check(metadata: &Metadata) -> BTreeMap<String, Vec<String>> {
    let mut violations: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (package, forbidden) in RULES {
        let Some(found) = metadata.packages.iter().find(|p| p.name == *package) else {
            continue;
        };
        for dep in &found.dependencies {
            if dep.kind.is_none() && forbidden.contains(&dep.name.as_str()) {
                violations
                    .entry(found.name.clone())
                    .or_default()
                    .push(dep.name.clone());
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(json: &str) -> Metadata {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn clean_workspace_passes() {
        let m = metadata(
            r#"{"packages":[
                {"name":"emberhold-domain","dependencies":[
                    {"name":"serde","kind":null},
                    {"name":"tokio","kind":"dev"}
                ]}
            ]}"#,
        );
        assert!(check(&m).is_empty());
    }

    #[test]
    fn io_dependency_in_domain_is_reported() {
        let m = metadata(
            r#"{"packages":[
                {"name":"emberhold-domain","dependencies":[
                    {"name":"tokio","kind":null},
                    {"name":"emberhold-engine","kind":null}
                ]}
            ]}"#,
        );
        let violations = check(&m);
        assert_eq!(
            violations.get("emberhold-domain"),
            Some(&vec!["tokio".to_string(), "emberhold-engine".to_string()])
        );
    }
}
