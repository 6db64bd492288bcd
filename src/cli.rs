//! Command-line surface.

use std::time::Duration;

use chat_api::config::{BASE_URL_ENV_VAR, TIMEOUT_SECS_ENV_VAR};
use chat_api::{ChatApiConfig, DEFAULT_BASE_URL};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "chat_client", version, about = "Stream replies from a chat backend")]
pub struct Cli {
    /// Backend base URL.
    #[arg(long, env = BASE_URL_ENV_VAR, default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Request timeout in seconds. Unlimited when omitted.
    #[arg(long, env = TIMEOUT_SECS_ENV_VAR, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List known threads.
    Threads,
    /// Print the message history of a thread.
    History {
        thread_id: String,
    },
    /// Send a message and stream the reply to stdout.
    Send {
        /// Continue an existing thread instead of starting a new one.
        #[arg(long = "thread")]
        thread_id: Option<String>,
        /// Message text; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
}

impl Cli {
    pub fn api_config(&self) -> ChatApiConfig {
        let mut config = ChatApiConfig::new(self.base_url.clone())
            .with_user_agent(concat!("chat_client/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn send_joins_words_and_reads_thread_flag() {
        let cli = Cli::try_parse_from([
            "chat_client",
            "--base-url",
            "http://backend:8000",
            "send",
            "--thread",
            "t-9",
            "what",
            "now",
        ])
        .expect("parse");

        assert_eq!(cli.base_url, "http://backend:8000");
        match cli.command {
            Command::Send { thread_id, message } => {
                assert_eq!(thread_id.as_deref(), Some("t-9"));
                assert_eq!(message.join(" "), "what now");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn send_requires_a_message() {
        assert!(Cli::try_parse_from(["chat_client", "send"]).is_err());
    }

    #[test]
    fn timeout_flows_into_api_config() {
        let cli = Cli::try_parse_from(["chat_client", "--timeout-secs", "5", "threads"])
            .expect("parse");
        assert_eq!(cli.api_config().timeout, Some(Duration::from_secs(5)));
    }
}
