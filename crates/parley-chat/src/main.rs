use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use parley_chat::Session;
use parley_chat::config::{Cli, Command, ContactsCommand};
use parley_conversations::FormattedConversation;
use parley_core::{ContactDirectory, UserId};
use parley_logging::ParleySubscriberBuilder;
use parley_storage::{FileStore, KeyValueStore};

fn parse_ids(raw: &[String]) -> anyhow::Result<Vec<UserId>> {
    raw.iter()
        .map(|s| UserId::parse(s).with_context(|| format!("invalid user id {s:?}")))
        .collect()
}

fn require_session(storage: Arc<dyn KeyValueStore>) -> anyhow::Result<Session> {
    match Session::resume(storage) {
        Some(session) => Ok(session),
        None => bail!("not logged in; run `parley login <id>` first"),
    }
}

fn print_conversation(index: usize, conversation: &FormattedConversation) {
    let marker = if conversation.selected { '*' } else { ' ' };
    let last = conversation
        .messages
        .last()
        .map(|m| format!("{}: {}", m.sender_name, m.text))
        .unwrap_or_default();
    let title = conversation.title();
    println!("{marker} [{index}] {title}  {last}");
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = ParleySubscriberBuilder::new()
        .with_config(cli.log_config())
        .init();

    let data_dir = cli.data_dir();
    let storage: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&data_dir)
            .with_context(|| format!("opening data directory {}", data_dir.display()))?,
    );

    match cli.command {
        Command::Login { id } => {
            let session = Session::login(storage, &id)?;
            println!("Logged in as {}", session.self_id());
        }
        Command::Whoami => match Session::stored_identity(&*storage) {
            Some(id) => println!("{id}"),
            None => println!("Not logged in"),
        },
        Command::Logout => {
            if Session::logout(&*storage)? {
                println!("Logged out");
            } else {
                println!("Not logged in");
            }
        }
        Command::Contacts { command } => {
            let session = require_session(storage)?;
            match command {
                ContactsCommand::Add { id, name } => {
                    session.contacts().create_contact(UserId::parse(&id)?, name)?;
                }
                ContactsCommand::List => {
                    for contact in session.contacts().contacts() {
                        println!("{}  {}", contact.id, contact.name);
                    }
                }
            }
        }
        Command::New { recipients } => {
            let mut session = require_session(storage)?;
            session
                .conversations_mut()
                .create_conversation(parse_ids(&recipients)?)?;
        }
        Command::Send { to, text } => {
            let mut session = require_session(storage)?;
            session
                .conversations_mut()
                .send_message(parse_ids(&to)?, text)?;
        }
        Command::List => {
            let session = require_session(storage)?;
            let formatted = session.conversations().formatted_conversations();
            if formatted.is_empty() {
                println!("No conversations");
            }
            for (index, conversation) in formatted.iter().enumerate() {
                print_conversation(index, conversation);
            }
        }
        Command::Show { index } => {
            let mut session = require_session(storage)?;
            session.conversations_mut().select_conversation_index(index);
            let Some(conversation) = session.conversations().selected_conversation() else {
                bail!("no conversation at index {index}");
            };
            println!("{}", conversation.title());
            for message in &conversation.messages {
                let who = if message.from_me { "me" } else { message.sender_name.as_str() };
                println!("  {who}: {}", message.text);
            }
        }
    }

    Ok(())
}
