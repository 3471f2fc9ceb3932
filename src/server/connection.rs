use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader };
use tokio::net::TcpStream;

use crate::config::{ HELP_COMMAND, HELP_COMMAND_ALIAS, SERVER_BANNER };
use crate::core::{ ChatCommand, parse_chat_line };
use crate::plugins::{ CommandRegistry, ReplySink };
use crate::services::{ generate_help_response, unknown_command_response };
use crate::{ log_debug, log_warn };

/// Longest chat line accepted before the connection is dropped
pub const MAX_LINE_BYTES: usize = 4096;

/// Outcome of reading one chat line
#[derive(Debug, PartialEq, Eq)]
pub enum LineRead {
    /// A line, lossily decoded; may lack the final newline at end of stream
    Line(String),
    Eof,
    /// More than `MAX_LINE_BYTES` arrived without a newline
    TooLong,
}

/// Read one line, never buffering more than `MAX_LINE_BYTES` plus the newline
pub async fn read_chat_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<LineRead>
    where R: AsyncBufRead + Unpin
{
    buf.clear();
    let read = (&mut *reader).take((MAX_LINE_BYTES as u64) + 1).read_until(b'\n', buf).await?;

    if read == 0 {
        return Ok(LineRead::Eof);
    }
    if buf.len() > MAX_LINE_BYTES && buf.last() != Some(&b'\n') {
        return Ok(LineRead::TooLong);
    }

    Ok(LineRead::Line(String::from_utf8_lossy(buf).into_owned()))
}

/// Route one chat line to its command
///
/// Returns `false` for ordinary chat that is not addressed to the bot.
pub async fn dispatch_line(registry: &CommandRegistry, line: &str, replies: &ReplySink) -> bool {
    let ChatCommand::Invoke { name, args } = parse_chat_line(line) else {
        return false;
    };

    if name.eq_ignore_ascii_case(HELP_COMMAND) || name == HELP_COMMAND_ALIAS {
        replies.plain(generate_help_response(registry));
    } else if let Some(plugin) = registry.get(&name) {
        log_debug!("Dispatching /{} to plugin {}", name, plugin.name());
        plugin.handle(&args, replies).await;
    } else {
        log_debug!("Unknown command: /{}", name);
        replies.plain(unknown_command_response(&name));
    }

    true
}

/// Write one chat message followed by a blank separator line
pub async fn write_message<W>(writer: &mut W, message: &str) -> std::io::Result<()>
    where W: AsyncWrite + Unpin
{
    let mut framed = message.trim_end_matches(['\r', '\n']).replace("\r\n", "\n").replace('\n', "\r\n");
    framed.push_str("\r\n\r\n");

    writer.write_all(framed.as_bytes()).await?;
    writer.flush().await
}

/// Serve one chat client until it disconnects or goes idle
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    idle_timeout: Duration,
    registry: Arc<CommandRegistry>
) -> Result<()> {
    if let Err(e) = stream.set_nodelay(true) {
        log_warn!("Failed to set TCP_NODELAY: {}", e);
    }

    let (read_half, mut writer) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    write_message(&mut writer, SERVER_BANNER).await?;

    let mut buf = Vec::with_capacity(256);
    loop {
        let read = match tokio::time::timeout(idle_timeout, read_chat_line(&mut reader, &mut buf)).await {
            Ok(read) => read?,
            Err(_) => {
                log_debug!("Closing idle connection from {}", addr);
                break;
            }
        };

        let line = match read {
            LineRead::Line(line) => line,
            LineRead::Eof => {
                log_debug!("Client {} disconnected", addr);
                break;
            }
            LineRead::TooLong => {
                log_warn!("Dropping {}: line exceeds {} bytes", addr, MAX_LINE_BYTES);
                break;
            }
        };

        let message = line.trim().to_string();
        if message.is_empty() {
            continue;
        }
        log_debug!("Received from {}: {}", addr, message);

        // Replies are written while the command runs, so the progress notice
        // reaches the client before the market answers.
        let (sink, mut rx) = ReplySink::channel();
        let command_registry = registry.clone();
        let command = async move {
            dispatch_line(&command_registry, &message, &sink).await;
        };
        let delivery = async {
            while let Some(reply) = rx.recv().await {
                write_message(&mut writer, &reply).await?;
            }
            Ok::<(), std::io::Error>(())
        };

        let ((), delivered) = tokio::join!(command, delivery);
        delivered?;
    }

    if let Err(e) = writer.shutdown().await {
        log_debug!("Error shutting down connection to {}: {}", addr, e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::collect_replies;
    use crate::services::price::{ DISABLED_MESSAGE, PricePlugin };

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(PricePlugin::disabled())).unwrap();
        registry
    }

    async fn dispatch(line: &str) -> (bool, Vec<String>) {
        let registry = registry();
        let (sink, rx) = ReplySink::channel();
        let handled = dispatch_line(&registry, line, &sink).await;
        drop(sink);
        (handled, collect_replies(rx))
    }

    #[tokio::test]
    async fn test_dispatch_price_command() {
        assert_eq!(dispatch("/查价格 AK-47").await, (true, vec![DISABLED_MESSAGE.to_string()]));
        assert_eq!(dispatch("/PRICE AK-47").await, (true, vec![DISABLED_MESSAGE.to_string()]));
    }

    #[tokio::test]
    async fn test_dispatch_help() {
        let (handled, replies) = dispatch("/帮助").await;
        assert!(handled);
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("/查价格"));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_and_plain_chat() {
        assert_eq!(dispatch("/roll 6").await, (true, vec![unknown_command_response("roll")]));
        assert_eq!(dispatch("nice skin").await, (false, Vec::new()));
    }

    #[tokio::test]
    async fn test_read_chat_line_decodes_invalid_utf8() {
        let mut input: &[u8] = b"\xff\xfe caf\xe9\r\n/help\r\n";
        let mut buf = Vec::new();

        let first = read_chat_line(&mut input, &mut buf).await.unwrap();
        assert_eq!(first, LineRead::Line("\u{FFFD}\u{FFFD} caf\u{FFFD}\r\n".to_string()));
        assert_eq!(read_chat_line(&mut input, &mut buf).await.unwrap(), LineRead::Line("/help\r\n".to_string()));
        assert_eq!(read_chat_line(&mut input, &mut buf).await.unwrap(), LineRead::Eof);
    }

    #[tokio::test]
    async fn test_read_chat_line_stops_at_limit() {
        let long = vec![b'a'; MAX_LINE_BYTES * 4];
        let mut input: &[u8] = &long;
        let mut buf = Vec::new();

        assert_eq!(read_chat_line(&mut input, &mut buf).await.unwrap(), LineRead::TooLong);
        assert_eq!(buf.len(), MAX_LINE_BYTES + 1);
    }

    #[tokio::test]
    async fn test_read_chat_line_accepts_line_at_limit() {
        let mut exact = vec![b'a'; MAX_LINE_BYTES];
        exact.push(b'\n');
        let mut input: &[u8] = &exact;
        let mut buf = Vec::new();

        assert!(matches!(read_chat_line(&mut input, &mut buf).await.unwrap(), LineRead::Line(_)));
    }

    #[tokio::test]
    async fn test_write_message_framing() {
        let mut out: Vec<u8> = Vec::new();
        write_message(&mut out, "line one\nline two\n").await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "line one\r\nline two\r\n\r\n");
    }
}
