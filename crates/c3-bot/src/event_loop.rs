//! Inbound event loop
//!
//! Reads JSON-lines events and runs each on its own task. Malformed lines,
//! including ones that are not valid UTF-8, are logged and skipped. At end of input the loop waits for in-flight
//! events before returning.

use crate::command::InboundEvent;
use crate::dispatcher::Dispatcher;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;

/// Read events from `reader` until end of input
///
/// Returns the number of events dispatched.
///
/// # Errors
/// - `std::io::Error` if reading from `reader` fails
pub async fn run<R>(reader: R, dispatcher: Arc<Dispatcher>) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.split(b'\n');
    let mut tasks = JoinSet::new();
    let mut dispatched = 0usize;

    loop {
        tokio::select! {
            segment = lines.next_segment() => {
                let Some(segment) = segment? else { break };
                let line = match String::from_utf8(segment) {
                    Ok(line) => line,
                    Err(err) => {
                        tracing::warn!(error = %err, "skipping event that is not valid UTF-8");
                        continue;
                    }
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<InboundEvent>(line) {
                    Ok(event) => {
                        let dispatcher = Arc::clone(&dispatcher);
                        tasks.spawn(async move { dispatcher.handle(event).await });
                        dispatched += 1;
                    }
                    Err(err) => tracing::warn!(error = %err, "skipping malformed event"),
                }
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                log_join(joined);
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        log_join(joined);
    }
    tracing::info!(dispatched, "input closed");
    Ok(dispatched)
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(err) = joined {
        tracing::error!(error = %err, "event task failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotConfig;
    use crate::jsonl::JsonLinesTransport;
    use crate::upload::HttpFetcher;
    use c3_catalog::{Catalog, MemoryStore, Proposals};

    fn dispatcher(transport: Arc<JsonLinesTransport<tokio::io::DuplexStream>>) -> Arc<Dispatcher> {
        Arc::new(Dispatcher::new(
            Catalog::new(Arc::new(MemoryStore::new()), ""),
            Arc::new(Proposals::new()),
            transport,
            Arc::new(HttpFetcher::new()),
            &BotConfig::default(),
        ))
    }

    #[tokio::test]
    async fn skips_malformed_and_blank_lines() {
        let (writer, mut output) = tokio::io::duplex(4096);
        let transport = Arc::new(JsonLinesTransport::new(writer));
        let input = concat!(
            "not json\n",
            "\n",
            r#"{"type":"interaction","id":"a","actor":{"id":"1"},"command":"cocktail","subcommand":"list"}"#,
            "\n",
        );

        let count = run(input.as_bytes(), dispatcher(transport)).await.unwrap();
        assert_eq!(count, 1);

        let mut buf = vec![0u8; 4096];
        let n = tokio::io::AsyncReadExt::read(&mut output, &mut buf).await.unwrap();
        let text = String::from_utf8_lossy(&buf[..n]);
        assert!(text.contains("I currently know about 0 cocktails"));
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_stop_the_loop() {
        let (writer, mut output) = tokio::io::duplex(4096);
        let transport = Arc::new(JsonLinesTransport::new(writer));
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(
            br#"{"type":"interaction","id":"a","actor":{"id":"1"},"command":"cocktail","subcommand":"list"}"#,
        );
        input.push(b'\n');

        let count = run(input.as_slice(), dispatcher(transport)).await.unwrap();
        assert_eq!(count, 1);

        let mut buf = vec![0u8; 4096];
        let n = tokio::io::AsyncReadExt::read(&mut output, &mut buf).await.unwrap();
        let text = String::from_utf8_lossy(&buf[..n]);
        assert!(text.contains("I currently know about 0 cocktails"));
    }

    #[tokio::test]
    async fn empty_input_dispatches_nothing() {
        let (writer, _output) = tokio::io::duplex(64);
        let transport = Arc::new(JsonLinesTransport::new(writer));
        assert_eq!(run(&b""[..], dispatcher(transport)).await.unwrap(), 0);
    }
}
