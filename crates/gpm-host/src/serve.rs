//! Host side of the JSON-lines bridge.
//!
//! One JSON request per line comes in, one JSON response per line goes out.
//! Diagnostics go through `tracing` and never onto the response stream.

use gpm_protocol::{
    error_codes, Command, HostError, Request, Response, ResponseData, ResponseResult,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::local::LocalHost;

/// Answer requests against `host` until `Shutdown` or end of input.
///
/// The workbook is left in `host`; persisting it is up to the caller.
pub async fn serve<R, W>(host: &mut LocalHost, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tracing::info!(
        "Serving as {} host on {}",
        host.info().host,
        host.info().platform
    );

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.map_err(Error::ReadFailed)? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Malformed request: {e}");
                // id 0: the request id could not be read
                let response = Response {
                    id: 0,
                    result: ResponseResult::Error {
                        error: HostError::new(
                            error_codes::INVALID_REQUEST,
                            format!("JSON parse error: {e}"),
                        ),
                    },
                };
                write_response(&mut writer, &response).await?;
                continue;
            }
        };

        let shutdown = matches!(request.command, Command::Shutdown);
        let response = handle_request(host, request);
        write_response(&mut writer, &response).await?;

        if shutdown {
            tracing::info!("Shutdown requested");
            return Ok(());
        }
    }

    tracing::info!("Input closed");
    Ok(())
}

fn handle_request(host: &mut LocalHost, request: Request) -> Response {
    let result = match request.command {
        Command::Hello => ResponseResult::Ok {
            data: Some(ResponseData::Ready {
                info: host.info().clone(),
            }),
        },
        Command::Sync { operations } => {
            tracing::debug!("Request {}: {} operation(s)", request.id, operations.len());
            match host.execute(&operations) {
                Ok(results) => ResponseResult::Ok {
                    data: Some(ResponseData::Results { results }),
                },
                Err(error) => ResponseResult::Error { error },
            }
        }
        Command::Shutdown => ResponseResult::Ok { data: None },
    };

    Response {
        id: request.id,
        result,
    }
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) -> Result<()> {
    let mut json = serde_json::to_string(response)?;
    json.push('\n');
    writer
        .write_all(json.as_bytes())
        .await
        .map_err(Error::SendFailed)?;
    writer.flush().await.map_err(Error::SendFailed)
}
