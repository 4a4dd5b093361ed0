//! Client side of the JSON-lines host bridge.

use std::path::PathBuf;
use std::process::Stdio;

use gpm_protocol::{
    Command as HostCommand, HostInfo, Operation, OperationResult, Request, Response,
    ResponseData, ResponseResult,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::error::{Error, Result};
use crate::transport::Transport;

/// How to launch a host process.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Executable speaking the host protocol on stdin/stdout.
    pub program: PathBuf,
    /// Arguments passed to the executable.
    pub args: Vec<String>,
}

impl BridgeConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Split a command line on whitespace: the first word is the program.
    ///
    /// No shell quoting is supported.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let program = words.next()?;
        Some(Self {
            program: PathBuf::from(program),
            args: words.map(str::to_string).collect(),
        })
    }
}

/// Talks to a host over a line-oriented JSON stream.
///
/// Requests are answered strictly in order, one response line per request.
pub struct BridgeHost<R, W> {
    reader: R,
    writer: W,
    /// The child process, if we spawned it.
    child: Option<Child>,
    next_id: u64,
}

/// A bridge to a host running as a child process.
pub type ProcessBridge = BridgeHost<BufReader<ChildStdout>, ChildStdin>;

impl ProcessBridge {
    /// Spawn the host process. Its stderr is inherited for diagnostics.
    pub async fn start(config: BridgeConfig) -> Result<Self> {
        let mut cmd = Command::new(&config.program);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        tracing::info!("Starting host process: {:?}", cmd);
        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::HostNotFound(config.program.display().to_string())
            } else {
                Error::SpawnFailed(e)
            }
        })?;

        let stdin = child.stdin.take().ok_or(Error::NotRunning)?;
        let stdout = child.stdout.take().ok_or(Error::NotRunning)?;

        let mut bridge = BridgeHost::new(BufReader::new(stdout), stdin);
        bridge.child = Some(child);
        Ok(bridge)
    }
}

impl<R, W> BridgeHost<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Wrap an already-connected stream pair.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            child: None,
            next_id: 1,
        }
    }

    /// Send a command and wait for its response.
    async fn send_command(&mut self, command: HostCommand) -> Result<Option<ResponseData>> {
        let id = self.next_id;
        self.next_id += 1;

        let mut json = serde_json::to_string(&Request { id, command })?;
        json.push('\n');

        self.writer
            .write_all(json.as_bytes())
            .await
            .map_err(Error::SendFailed)?;
        self.writer.flush().await.map_err(Error::SendFailed)?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(Error::ReadFailed)?;
        if read == 0 {
            return Err(Error::NotRunning);
        }

        let response: Response = serde_json::from_str(&line)?;
        // id 0 is what a host answers when it could not parse the request
        if response.id != id && response.id != 0 {
            tracing::warn!("Response id {} does not match request id {id}", response.id);
            return Err(Error::UnexpectedResponse);
        }

        match response.result {
            ResponseResult::Ok { data } => Ok(data),
            ResponseResult::Error { error } => Err(Error::Host(error)),
        }
    }

    /// Ask the host to persist and exit, then reap the process if we own it.
    pub async fn shutdown(mut self) -> Result<()> {
        self.send_command(HostCommand::Shutdown).await?;

        if let Some(mut child) = self.child.take() {
            let _ = child.wait().await;
        }

        Ok(())
    }
}

impl<R, W> Transport for BridgeHost<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    async fn hello(&mut self) -> Result<HostInfo> {
        match self.send_command(HostCommand::Hello).await? {
            Some(ResponseData::Ready { info }) => Ok(info),
            _ => Err(Error::UnexpectedResponse),
        }
    }

    async fn sync(&mut self, operations: Vec<Operation>) -> Result<Vec<OperationResult>> {
        match self
            .send_command(HostCommand::Sync { operations })
            .await?
        {
            Some(ResponseData::Results { results }) => Ok(results),
            _ => Err(Error::UnexpectedResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_command_line() {
        let config = BridgeConfig::from_command_line("gpm serve book.json").unwrap();
        assert_eq!(config.program, PathBuf::from("gpm"));
        assert_eq!(config.args, vec!["serve", "book.json"]);
        assert!(BridgeConfig::from_command_line("   ").is_none());
    }

    #[tokio::test]
    async fn test_host_error_is_surfaced() {
        let reply = concat!(
            r#"{"id":1,"status":"error","error":{"code":"GeneralException","message":"boom"}}"#,
            "\n"
        );
        let mut bridge = BridgeHost::new(reply.as_bytes(), Vec::new());

        let err = bridge.hello().await.unwrap_err();
        assert_eq!(err.code(), Some("GeneralException"));
        assert_eq!(err.to_string(), "boom");

        let sent = String::from_utf8(bridge.writer.clone()).unwrap();
        assert_eq!(sent, "{\"id\":1,\"cmd\":\"Hello\"}\n");
    }

    #[tokio::test]
    async fn test_closed_stream() {
        let mut bridge = BridgeHost::new(&b""[..], Vec::new());
        assert!(matches!(bridge.hello().await, Err(Error::NotRunning)));
    }

    #[tokio::test]
    async fn test_mismatched_id() {
        let reply = "{\"id\":9,\"status\":\"ok\"}\n";
        let mut bridge = BridgeHost::new(reply.as_bytes(), Vec::new());
        assert!(matches!(bridge.hello().await, Err(Error::UnexpectedResponse)));
    }
}
