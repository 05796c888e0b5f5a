use std::io::Write;
use std::process::{Command, Stdio};
use anyhow::{bail, Context};

/// Pipes generated Rust source through `rustfmt`.
pub fn rustfmt(input: String) -> anyhow::Result<String> {
    let mut command = Command::new("rustfmt")
        .arg("--emit")
        .arg("stdout")
        .arg("--edition")
        .arg("2021")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .context("Failed to spawn rustfmt")?;

    // Dropping stdin closes the pipe so rustfmt sees EOF
    let mut stdin = command.stdin.take().context("rustfmt stdin is not piped")?;
    stdin.write_all(input.as_bytes())?;
    drop(stdin);

    let output = command.wait_with_output()?;
    if !output.status.success() {
        bail!("rustfmt exited with {}", output.status);
    }
    let stdout = String::from_utf8(output.stdout)?;
    Ok(stdout)
}
