//! Session connection handling
//!
//! Reads command lines from an input source, dispatches them, and writes the
//! replies to an output sink.

use crate::commands::Command;
use crate::dispatch::Dispatcher;
use crate::protocol::{Reply, ReplyEncoder};
use bytes::BytesMut;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Connection handler
pub struct Connection<R, W> {
    /// Line source
    reader: R,

    /// Reply sink
    writer: W,

    /// Read buffer for the current line
    line: Vec<u8>,

    /// Write buffer
    write_buffer: BytesMut,

    /// Written before each read when set
    prompt: Option<String>,
}

impl<R, W> Connection<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a new connection handler
    pub fn new(reader: R, writer: W) -> Self {
        Connection {
            reader,
            writer,
            line: Vec::with_capacity(256),
            write_buffer: BytesMut::with_capacity(4096),
            prompt: None,
        }
    }

    /// Write `prompt` before every line read
    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Handle the connection
    ///
    /// Runs until END or end of input. Returns the number of commands
    /// executed; blank and unparseable lines are not counted.
    pub async fn handle(&mut self, dispatcher: &mut Dispatcher) -> anyhow::Result<usize> {
        let mut executed = 0;

        loop {
            if let Some(prompt) = &self.prompt {
                self.writer.write_all(prompt.as_bytes()).await?;
                self.writer.flush().await?;
            }

            self.line.clear();
            let n = self.reader.read_until(b'\n', &mut self.line).await?;

            if n == 0 {
                debug!("End of input");
                break;
            }

            // Invalid UTF-8 is replaced rather than rejected
            let parsed = Command::parse(&String::from_utf8_lossy(&self.line));

            let reply = match parsed {
                Ok(None) => continue,
                Ok(Some(Command::End)) => {
                    debug!("END received");
                    break;
                }
                Ok(Some(command)) => {
                    executed += 1;
                    dispatcher.dispatch(command)
                }
                Err(e) => {
                    warn!("Invalid command line: {}", e);
                    Reply::error(e.to_string())
                }
            };

            debug!("Reply: {}", reply);
            self.send_reply(&reply).await?;
        }

        self.writer.flush().await?;
        Ok(executed)
    }

    /// Send a reply to the client
    async fn send_reply(&mut self, reply: &Reply) -> anyhow::Result<()> {
        if reply.is_silent() {
            return Ok(());
        }

        self.write_buffer.clear();
        ReplyEncoder::encode_to(&mut self.write_buffer, reply);

        self.writer.write_all(&self.write_buffer).await?;
        self.writer.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;
    use tokio_test::io::Builder;

    async fn run_script(script: &str) -> (String, usize) {
        let reader = BufReader::new(Builder::new().read(script.as_bytes()).build());
        let mut output = Vec::new();
        let mut dispatcher = Dispatcher::new();

        let executed = Connection::new(reader, &mut output)
            .handle(&mut dispatcher)
            .await
            .unwrap();

        (String::from_utf8(output).unwrap(), executed)
    }

    #[tokio::test]
    async fn test_basic_script() {
        let (output, executed) = run_script(
            "SET ex 10\nGET ex\nUNSET ex\nGET ex\nEND\n",
        )
        .await;

        assert_eq!(output, "10\nNULL\n");
        assert_eq!(executed, 4);
    }

    #[tokio::test]
    async fn test_counting_script() {
        let (output, _) = run_script(
            "SET a 10\nSET b 10\nNUMEQUALTO 10\nNUMEQUALTO 20\nSET b 30\nNUMEQUALTO 10\nEND\n",
        )
        .await;

        assert_eq!(output, "2\n0\n1\n");
    }

    #[tokio::test]
    async fn test_transaction_script() {
        let (output, _) = run_script(
            "BEGIN\nSET a 10\nGET a\nBEGIN\nSET a 20\nGET a\nROLLBACK\nGET a\nROLLBACK\nGET a\nEND\n",
        )
        .await;

        assert_eq!(output, "10\n20\n10\nNULL\n");
    }

    #[tokio::test]
    async fn test_commit_script() {
        let (output, _) = run_script(
            "BEGIN\nSET a 30\nBEGIN\nSET a 40\nCOMMIT\nGET a\nROLLBACK\nCOMMIT\nEND\n",
        )
        .await;

        assert_eq!(
            output,
            "40\nINVALID ROLLBACK\nINVALID COMMIT - NO TRANSACTION(S) IN PROGRESS\n"
        );
    }

    #[tokio::test]
    async fn test_stops_at_end() {
        let (output, executed) = run_script("SET a 1\nEND\nGET a\n").await;

        assert_eq!(output, "");
        assert_eq!(executed, 1);
    }

    #[tokio::test]
    async fn test_eof_without_end_or_trailing_newline() {
        let (output, _) = run_script("SET a 1\n\n   \nGET a").await;
        assert_eq!(output, "1\n");
    }

    #[tokio::test]
    async fn test_invalid_lines_are_reported() {
        let (output, executed) = run_script("FROB x\nSET a\nGET\n").await;

        assert_eq!(
            output,
            "INVALID OPERATION (frob) - Type 'END' to exit\n\
             INVALID ARGUMENTS (set) - expected 2\n\
             INVALID ARGUMENTS (get) - expected 1\n"
        );
        assert_eq!(executed, 0);
    }

    #[tokio::test]
    async fn test_prompt_and_split_reads() {
        let reader = BufReader::new(
            Builder::new()
                .read(b"SET a ")
                .read(b"5\nGET")
                .read(b" a\n")
                .build(),
        );
        let writer = Builder::new()
            .write(b"> ")
            .write(b"> ")
            .write(b"5\n")
            .write(b"> ")
            .build();
        let mut dispatcher = Dispatcher::new();

        let executed = Connection::new(reader, writer)
            .with_prompt(Some("> ".to_string()))
            .handle(&mut dispatcher)
            .await
            .unwrap();

        assert_eq!(executed, 2);
    }
}
