//! The stdio tool host.
//!
//! Each tool call runs on its own blocking task, since the destination
//! picker may wait on the operator indefinitely. Replies funnel through a
//! single writer task and are correlated by id, not by order.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use widget_compiler::{CompileError, ToolOutput, ToolRegistry};

use crate::protocol::{Incoming, Outgoing};

pub struct Host {
    registry: Arc<ToolRegistry>,
    instructions: String,
}

impl Host {
    pub fn new(registry: ToolRegistry, instructions: String) -> Self {
        Self {
            registry: Arc::new(registry),
            instructions,
        }
    }

    /// Serve requests from `reader` until EOF, then wait for in-flight calls.
    pub async fn serve<R, W>(&self, mut reader: R, writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (reply_tx, reply_rx) = unbounded_channel();
        let writer_task = tokio::spawn(write_replies(reply_rx, writer));

        let mut calls = JoinSet::new();
        let mut buf = Vec::new();
        let read_result = loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break Ok(()),
                Ok(_) => {}
                Err(e) => break Err(e),
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Malformed request: {}", e);
                    send_reply(&reply_tx, Outgoing::malformed(e));
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Incoming>(line) {
                Ok(Incoming::ListTools { id }) => {
                    send_reply(
                        &reply_tx,
                        Outgoing::Tools {
                            id,
                            instructions: self.instructions.clone(),
                            tools: self.registry.specs(),
                        },
                    );
                }
                Ok(Incoming::CallTool { id, name, arguments }) => {
                    calls.spawn(call_tool(
                        Arc::clone(&self.registry),
                        id,
                        name,
                        arguments,
                        reply_tx.clone(),
                    ));
                }
                Err(e) => {
                    tracing::warn!("Malformed request: {}", e);
                    send_reply(&reply_tx, Outgoing::malformed(e));
                }
            }
        };

        if let Err(e) = &read_result {
            tracing::error!("Reading requests failed: {}", e);
        }

        tracing::debug!("input closed, waiting for {} in-flight calls", calls.len());
        while let Some(joined) = calls.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Tool task failed: {}", e);
            }
        }

        drop(reply_tx);
        writer_task.await??;
        read_result?;
        Ok(())
    }
}

fn send_reply(reply_tx: &UnboundedSender<Outgoing>, reply: Outgoing) {
    if reply_tx.send(reply).is_err() {
        tracing::warn!("Reply channel closed, dropping reply");
    }
}

async fn call_tool(
    registry: Arc<ToolRegistry>,
    id: Value,
    name: String,
    arguments: Value,
    reply_tx: UnboundedSender<Outgoing>,
) {
    tracing::info!(tool = %name, "tool call");

    let dispatched = {
        let name = name.clone();
        tokio::task::spawn_blocking(move || registry.dispatch(&name, arguments)).await
    };

    let output = match dispatched {
        Ok(output) => output,
        Err(e) => {
            tracing::error!(tool = %name, "tool task failed: {}", e);
            ToolOutput::failed(&name, CompileError::unexpected(e.to_string()).into())
        }
    };

    send_reply(&reply_tx, Outgoing::tool_result(id, output));
}

async fn write_replies<W>(mut rx: UnboundedReceiver<Outgoing>, mut writer: W) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(reply) = rx.recv().await {
        let line = reply.to_line()?;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}
