//! Parsing `--target` strings into engine constraints.
//!
//! A target is a comma-separated list like `es2020,chrome58,node12.19.0`.
//! Each element is an engine name glued to a version; `esnext` means "no
//! constraint".

use jolt_compat::{Constraints, Engine, parse_version};

/// Parse one comma-separated target list.
pub fn parse_target_list(text: &str) -> Result<Constraints, String> {
    let mut constraints = Constraints::default();
    for part in text.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if part.eq_ignore_ascii_case("esnext") {
            continue;
        }
        let (engine, version) = parse_single_target(part)?;
        constraints.insert(engine, version);
    }
    Ok(constraints)
}

fn parse_single_target(part: &str) -> Result<(Engine, Vec<u32>), String> {
    let lower = part.to_ascii_lowercase();
    let split = lower
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| invalid_target(part))?;
    let (name, version_text) = lower.split_at(split);

    let engine = Engine::from_name(name).ok_or_else(|| invalid_target(part))?;
    let version = parse_version(version_text).ok_or_else(|| invalid_target(part))?;
    if !version.pre_release.is_empty() {
        return Err(invalid_target(part));
    }
    Ok((engine, version.parts))
}

fn invalid_target(part: &str) -> String {
    let valid: Vec<&str> = Engine::ALL.iter().map(|e| e.name()).collect();
    format!(
        "Invalid target: {part:?} (expected an engine name followed by a version; engines: {}, or \"esnext\")",
        valid.join(", ")
    )
}
