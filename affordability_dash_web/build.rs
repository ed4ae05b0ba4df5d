use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../.git/HEAD");

    let commit = git(&["describe", "--always", "--dirty"]).unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=DASH_GIT_COMMIT={commit}");
}
