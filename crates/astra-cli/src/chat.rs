//! Interactive chat with the mentor.

use std::io::Write;

use anyhow::{Result, anyhow, bail};
use astra_core::{
  chat::{ChatMessage, Conversation, Sender},
  persona::MENTOR_NAME,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _};

use crate::client::{ApiClient, PageResponse};

const QUIT_COMMANDS: [&str; 3] = ["/quit", "/exit", "/q"];

/// Open the chat page, then relay each non-blank input line until EOF or a
/// quit command. Returns the conversation as it stood at the end.
pub async fn run<R, W>(client: &ApiClient, input: R, out: &mut W) -> Result<Conversation>
where
  R: AsyncBufRead + Unpin,
  W: Write,
{
  let view = match client.page("/chat").await? {
    PageResponse::View(view) => view,
    PageResponse::Redirect(to) => bail!("chat is not available yet; the server sent you to {to}"),
  };
  let child_name = view["child_name"]
    .as_str()
    .ok_or_else(|| anyhow!("chat page did not name the child"))?
    .to_string();

  let mut conversation = Conversation::welcome(&child_name);
  for message in conversation.messages() {
    print_message(out, message, &child_name)?;
  }

  let mut lines = input.lines();
  while let Some(line) = lines.next_line().await? {
    if QUIT_COMMANDS.contains(&line.trim()) {
      break;
    }
    let Some(message) = conversation.push_user(&line) else {
      continue;
    };
    let text = message.text.clone();

    let reply = match client.chat(&text, Some(&child_name)).await {
      Ok(reply) => conversation.push_reply(reply),
      Err(e) => {
        tracing::warn!(error = %e, "chat request failed");
        conversation.push_failure()
      }
    };
    print_message(out, reply, &child_name)?;
  }

  Ok(conversation)
}

fn print_message<W: Write>(out: &mut W, message: &ChatMessage, child_name: &str) -> Result<()> {
  let who = match message.sender {
    Sender::Astra => MENTOR_NAME,
    Sender::User => child_name,
  };
  writeln!(out, "{who}: {}", message.text)?;
  out.flush()?;
  Ok(())
}
