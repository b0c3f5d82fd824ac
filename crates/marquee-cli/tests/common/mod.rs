use std::path::Path;
use std::process::Output;

use tokio::process::Command;

/// Run the CLI with an isolated HOME so the session slot and config file
/// never touch the real user's directories.
pub async fn run_cli_with_env(args: &[&str], home: &Path, api_url: &str) -> Output {
    run_cli_with_input(args, home, api_url, "").await
}

/// Like [`run_cli_with_env`], feeding `input` on stdin.
pub async fn run_cli_with_input(args: &[&str], home: &Path, api_url: &str, input: &str) -> Output {
    use std::process::Stdio;
    use tokio::io::AsyncWriteExt;

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_marquee"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("XDG_CONFIG_HOME", home.join("config"));
    cmd.env("MARQUEE_API_URL", api_url);
    cmd.env_remove("MARQUEE_PAGE_SIZE");
    cmd.env_remove("MARQUEE_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().expect("Failed to execute CLI");
    let mut stdin = child.stdin.take().expect("stdin is piped");
    stdin
        .write_all(input.as_bytes())
        .await
        .expect("Failed to write stdin");
    drop(stdin);

    child.wait_with_output().await.expect("Failed to wait for CLI")
}

/// Run the CLI with a custom HOME and expect success.
pub async fn run_cli_with_env_success(args: &[&str], home: &Path, api_url: &str) -> String {
    let output = run_cli_with_env(args, home, api_url).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Path of the stored session token under an isolated HOME.
pub fn token_path(home: &Path) -> std::path::PathBuf {
    home.join("data").join("marquee").join("token.json")
}
