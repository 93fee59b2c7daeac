// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::time::Instant;

use clap::Parser;
use client::api::{DEFAULT_URL, TodoApi, TodoClient};
use client::commands::{Command, HELP};
use client::render::render;
use client::view::TodoView;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Parser)]
#[command(name = "todo-client")]
#[command(about = "Terminal front end for the to-do list")]
struct Cli {
    /// Base URL of the to-do server
    #[arg(long, env = "TODO_SERVER_URL", default_value = DEFAULT_URL)]
    server_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout belongs to the view, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let api = TodoClient::new(cli.server_url);
    tracing::info!("Using server at {}", api.base_url());

    let mut view = TodoView::new(api);
    view.load().await;
    println!("{}", render(&view));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let expiry = view.flash().map(|f| tokio::time::Instant::from_std(f.expires_at()));

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => {
                        println!("{HELP}");
                        continue;
                    }
                    Ok(command) => apply(&mut view, command).await,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                }
            }
            _ = tokio::time::sleep_until(expiry.unwrap_or_else(tokio::time::Instant::now)), if expiry.is_some() => {}
        }

        view.tick(Instant::now());
        println!("{}", render(&view));
    }

    Ok(())
}

/// Runs one command against the view.
async fn apply<A: TodoApi>(view: &mut TodoView<A>, command: Command) {
    match command {
        Command::Title(text) => view.set_title(text),
        Command::Description(text) => view.set_description(text),
        Command::Submit => view.submit().await,
        Command::Edit(n) => match task_id(view, n) {
            Some(id) => {
                view.begin_edit(&id);
            }
            None => println!("no task {n}"),
        },
        Command::Cancel => view.cancel_edit(),
        Command::Delete(n) => match task_id(view, n) {
            Some(id) => view.delete(&id).await,
            None => println!("no task {n}"),
        },
        Command::Alert {
            position,
            date,
            time,
            phone,
        } => match task_id(view, position) {
            Some(id) => {
                view.open_reminder(&id);
                if let Some(draft) = view.reminder_draft_mut() {
                    draft.date = date;
                    draft.time = time;
                    draft.phone = phone;
                }
                // A rejected draft is not kept open: the next alert command starts over.
                if !view.confirm_reminder() {
                    view.cancel_reminder();
                }
            }
            None => println!("no task {position}"),
        },
        Command::Dismiss => view.dismiss(),
        Command::Reload => view.load().await,
        Command::Help | Command::Quit => {}
    }
}

fn task_id<A: TodoApi>(view: &TodoView<A>, position: usize) -> Option<String> {
    view.tasks().get(position - 1).map(|t| t.id.clone())
}
