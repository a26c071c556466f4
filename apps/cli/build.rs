use std::env;
use std::process::Command;

/// Trimmed stdout of `git <args>`, if git ran and printed something.
fn git(args: &[&str]) -> Option<String> {
    let out = Command::new("git").args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8(out.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn main() {
    // Source tarballs have no .git; packagers pass the commit in CALC_GIT_SHA.
    let commit = env::var("CALC_GIT_SHA")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| {
            let sha = git(&["rev-parse", "--short=12", "HEAD"])?;
            let dirty = git(&["status", "--porcelain", "--untracked-files=no"]).is_some();
            Some(if dirty { format!("{sha}-dirty") } else { sha })
        })
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=GIT_SHA={commit}");
    println!("cargo:rerun-if-env-changed=CALC_GIT_SHA");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
