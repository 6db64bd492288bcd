use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context};
use chat_api::{ChatApiClient, ChatRequest, StreamOutcome};
use chat_client::{logging, Cli, Command, ReplyPrinter};
use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();
    debug!(base_url = %cli.base_url, timeout_secs = ?cli.timeout_secs, "resolved backend");
    let client = ChatApiClient::new(cli.api_config()).context("building HTTP client")?;

    match cli.command {
        Command::Threads => {
            let threads = client.list_threads().await.context("listing threads")?;
            for thread in threads {
                if thread.title == thread.id {
                    println!("{}", thread.id);
                } else {
                    println!("{}\t{}", thread.id, thread.title);
                }
            }
        }
        Command::History { thread_id } => {
            let messages = client
                .get_history(&thread_id)
                .await
                .with_context(|| format!("loading history for {thread_id}"))?;
            for message in messages {
                println!("[{}] {}", message.role.as_str(), message.content);
            }
        }
        Command::Send { thread_id, message } => {
            let mut request = ChatRequest::new(message.join(" "));
            if let Some(thread_id) = thread_id {
                request = request.with_thread_id(thread_id);
            }

            let cancellation = Arc::new(AtomicBool::new(false));
            tokio::spawn({
                let cancellation = Arc::clone(&cancellation);
                async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        cancellation.store(true, Ordering::Release);
                    }
                }
            });

            let mut printer = ReplyPrinter::new(io::stdout(), io::stderr())
                .with_cancellation(Arc::clone(&cancellation));
            let outcome = client
                .stream_chat(&request, &mut printer, Some(&cancellation))
                .await;
            debug!(?outcome, thread_id = ?printer.thread_id(), "stream finished");

            match outcome {
                StreamOutcome::Completed => {}
                StreamOutcome::Cancelled if printer.write_error().is_some() => {}
                StreamOutcome::Cancelled => eprintln!("cancelled"),
                StreamOutcome::Failed(message) => bail!("stream failed: {message}"),
            }
        }
    }

    Ok(())
}
