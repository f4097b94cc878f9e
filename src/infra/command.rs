//! # Command Execution Module / 命令执行模块
//!
//! Spawns backend commands and captures their combined output. Long running
//! commands such as a VM bring-up can echo their output live while it is
//! being captured.
//!
//! 派生后端命令并捕获其合并输出。诸如虚拟机启动之类的长时间运行命令
//! 可以在捕获输出的同时实时回显。

use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::Mutex;

/// Spawns a command, captures its stdout and stderr.
/// The output streams are read concurrently and combined into a single string.
/// When `echo` is set every line is also printed as soon as it arrives.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The combined stdout and stderr as a `String`.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 输出流被并发读取并合并到一个字符串中。
/// 设置 `echo` 时，每一行在到达时也会被立即打印。
pub async fn spawn_and_capture(
    mut cmd: Command,
    echo: bool,
) -> (std::io::Result<ExitStatus>, String) {
    let mut child = match cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return (Err(e), String::new()),
    };

    let output = Arc::new(Mutex::new(String::new()));

    let stdout_handle = child
        .stdout
        .take()
        .map(|stdout| tokio::spawn(collect_lines(stdout, Arc::clone(&output), echo, false)));
    let stderr_handle = child
        .stderr
        .take()
        .map(|stderr| tokio::spawn(collect_lines(stderr, Arc::clone(&output), echo, true)));

    let status = child.wait().await;

    // Wait for the readers so no trailing output is lost.
    // 等待读取任务完成，以确保不会丢失尾部输出。
    for handle in [stdout_handle, stderr_handle].into_iter().flatten() {
        if let Err(e) = handle.await {
            log::warn!("failed to join output reader: {e}");
        }
    }

    let output = output.lock().await.clone();
    (status, output)
}

/// Drains `stream` line by line until EOF. Lines are decoded lossily, so a
/// backend printing non-UTF-8 bytes is still read to the end.
async fn collect_lines<R>(stream: R, output: Arc<Mutex<String>>, echo: bool, is_stderr: bool)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::warn!("failed to read backend output: {e}");
                break;
            }
        }
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\n', '\r']);
        if echo {
            if is_stderr {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        }
        let mut output = output.lock().await;
        output.push_str(line);
        output.push('\n');
    }
}

/// Renders a command line for logs and error messages.
/// 渲染命令行以用于日志和错误消息。
pub fn display_command(cmd: &Command) -> String {
    let std_cmd = cmd.as_std();
    std::iter::once(std_cmd.get_program())
        .chain(std_cmd.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
