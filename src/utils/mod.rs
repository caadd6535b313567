/// Check if the current environment has required external tools.
///
/// Only the yt-dlp fallback source needs a tool on PATH; a missing tool is
/// reported as a warning, not an error, since the caption API source can
/// still succeed without it.
pub async fn check_dependencies() -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available("yt-dlp").await {
        missing.push("yt-dlp - required for the subtitle extraction fallback".to_string());
    }

    missing
}

/// Check if a command is available in PATH
async fn check_command_available(command: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg("--version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}
