//! Interactive fallback for entering the authorized account id.

use crate::errors::LoginError;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tracing::debug;

/// A source of interactive line readers.
#[async_trait]
pub trait Terminal: Send + Sync {
    type Reader: LineReader;

    /// Opens a reader. It is closed when dropped.
    async fn open(&self) -> Result<Self::Reader, LoginError>;
}

/// Asks a question and reads one line of answer.
#[async_trait]
pub trait LineReader: Send {
    /// Prints `prompt` and returns the entered line without its line ending.
    async fn question(&mut self, prompt: &str) -> Result<String, LoginError>;
}

/// The process's standard input and output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdTerminal;

#[async_trait]
impl Terminal for StdTerminal {
    type Reader = PromptReader<BufReader<Stdin>, Stdout>;

    async fn open(&self) -> Result<Self::Reader, LoginError> {
        Ok(PromptReader::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout()))
    }
}

/// A line reader over any buffered input and output pair.
pub struct PromptReader<R, W> {
    input: R,
    output: W,
}

impl<R, W> PromptReader<R, W> {
    pub fn new(input: R, output: W) -> Self {
        debug!("Terminal prompt opened");
        Self { input, output }
    }
}

impl<R, W> Drop for PromptReader<R, W> {
    fn drop(&mut self) {
        debug!("Terminal prompt closed");
    }
}

#[async_trait]
impl<R, W> LineReader for PromptReader<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn question(&mut self, prompt: &str) -> Result<String, LoginError> {
        self.output
            .write_all(prompt.as_bytes())
            .await
            .map_err(|e| LoginError::PromptAborted(e.to_string()))?;
        self.output
            .flush()
            .await
            .map_err(|e| LoginError::PromptAborted(e.to_string()))?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .await
            .map_err(|e| LoginError::PromptAborted(e.to_string()))?;
        if read == 0 {
            return Err(LoginError::PromptAborted("input closed".to_string()));
        }

        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }
}
