//! Terminal stand-ins for the browser side of the checkout.
//!
//! `ConsoleProvider` prints the widget options as one JSON line and waits for
//! the widget's callback as one JSON line on its input. `ConsoleNavigator`
//! prints the final URL.

use crate::domain::payment::{ProviderResult, RedirectTarget};
use crate::domain::ports::{Navigator, PaymentProvider};
use crate::domain::provider::ProviderOptions;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

pub struct ConsoleProvider<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl<R, W> ConsoleProvider<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }
}

#[async_trait]
impl<R, W> PaymentProvider for ConsoleProvider<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn open(&self, options: ProviderOptions) -> Result<ProviderResult> {
        let mut line = serde_json::to_string(&options)?;
        line.push('\n');
        {
            let mut output = self.output.lock().await;
            output.write_all(line.as_bytes()).await?;
            output.flush().await?;
        }

        let mut input = self.input.lock().await;
        let mut reply = String::new();
        loop {
            reply.clear();
            if input.read_line(&mut reply).await? == 0 {
                // Closing the input is how a terminal user walks away.
                return Ok(ProviderResult::Dismissed);
            }
            if !reply.trim().is_empty() {
                break;
            }
        }
        serde_json::from_str(reply.trim())
            .map_err(|e| CheckoutError::Provider(format!("unreadable widget callback: {e}")))
    }
}

pub struct ConsoleNavigator<W> {
    base_url: Option<String>,
    output: Mutex<W>,
}

impl<W> ConsoleNavigator<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Relative targets are prefixed with `base_url` when one is given.
    pub fn new(output: W, base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.map(|b| b.trim_end_matches('/').to_string()),
            output: Mutex::new(output),
        }
    }

    pub fn into_inner(self) -> W {
        self.output.into_inner()
    }
}

#[async_trait]
impl<W> Navigator for ConsoleNavigator<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn navigate(&self, target: &RedirectTarget) -> Result<()> {
        let url = target.to_url();
        let line = match &self.base_url {
            Some(base) if url.starts_with('/') => format!("{base}{url}\n"),
            _ => format!("{url}\n"),
        };
        let mut output = self.output.lock().await;
        output.write_all(line.as_bytes()).await?;
        output.flush().await?;
        Ok(())
    }
}
