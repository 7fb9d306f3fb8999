use crate::cli::SessionCommand;
use crate::client::{CurrentSessionInfo, SessionAck, SessionDetail};
use crate::commands::{backend, print_banner};
use crate::config::Config;
use crate::confirm::{AssumeYes, Confirm, TerminalConfirm};
use crate::controllers::{DeleteOutcome, SessionListController, SessionRow};
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Table};
use std::sync::Arc;

const PREVIEW_WIDTH: usize = 48;

/// Handle session commands
pub async fn handle_sessions(config: &Config, command: SessionCommand) -> Result<()> {
    let confirm: Arc<dyn Confirm> = match &command {
        SessionCommand::Delete { yes: true, .. } => Arc::new(AssumeYes),
        _ => Arc::new(TerminalConfirm),
    };

    let controller = SessionListController::new(backend(config)?, confirm)
        .on_new_session(|id| println!("{}", format!("Started new session {}", id).green()))
        .on_session_loaded(|id, payload| println!("{}", loaded_summary(id, payload).green()));

    match command {
        SessionCommand::List => {
            if let Err(e) = controller.list_sessions().await {
                print_banner(controller.error());
                return Err(e);
            }
            print_sessions(&controller.rows());
        }
        SessionCommand::New => {
            if let Err(e) = controller.create_session().await {
                print_banner(controller.error());
                return Err(e);
            }
            print_sessions(&controller.rows());
        }
        SessionCommand::Load { id } => {
            if let Err(e) = controller.load_session(&id).await {
                print_banner(controller.error());
                return Err(e);
            }
        }
        SessionCommand::Show { id } => {
            let detail = controller.session_detail(&id).await?;
            print_detail(&detail);
        }
        SessionCommand::Delete { id, .. } => match controller.delete_session(&id).await {
            Ok(DeleteOutcome::Deleted) => {
                println!("{}", format!("Deleted session {}", id).green());
            }
            Ok(DeleteOutcome::Declined) => {
                println!("{}", "Deletion cancelled.".yellow());
            }
            Err(e) => {
                print_banner(controller.error());
                return Err(e);
            }
        },
        SessionCommand::Save => {
            let ack = match controller.save_current().await {
                Ok(ack) => ack,
                Err(e) => {
                    print_banner(controller.error());
                    return Err(e);
                }
            };
            print_ack(&ack, "Session saved");
            print_sessions(&controller.rows());
        }
        SessionCommand::Clear => match controller.clear_current().await {
            Ok(ack) => print_ack(&ack, "Session cleared"),
            Err(e) => {
                print_banner(controller.error());
                return Err(e);
            }
        },
        SessionCommand::Info => {
            let info = controller.current_session_info().await?;
            print_info(&info);
        }
    }

    Ok(())
}

/// One-line summary of a load acknowledgment
///
/// Prefers the backend's own message, then the agent count, then the number of
/// returned messages when the payload carries them.
fn loaded_summary(id: &str, payload: &serde_json::Value) -> String {
    if let Some(message) = payload.get("message").and_then(|m| m.as_str()) {
        return message.to_string();
    }
    if let Some(agents) = payload.get("agents_loaded").and_then(|a| a.as_u64()) {
        return format!("Loaded session {} ({} agents)", id, agents);
    }
    match payload.get("messages").and_then(|m| m.as_array()) {
        Some(messages) => format!("Loaded session {} ({} messages)", id, messages.len()),
        None => format!("Loaded session {}", id),
    }
}

fn print_ack(ack: &SessionAck, fallback: &str) {
    let message = ack.message.as_deref().unwrap_or(fallback);
    println!("{}", message.green());
}

fn print_info(info: &CurrentSessionInfo) {
    println!("\nCurrent Session:\n");
    let generating = if info.is_generating {
        "yes".yellow()
    } else {
        "no".normal()
    };
    println!("Generating:    {}", generating);
    println!(
        "Current agent: {}",
        info.current_agent.as_deref().unwrap_or("-").cyan()
    );

    if info.agents.is_empty() {
        println!("\n{}", "No agents loaded.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "Agent".bold(),
        "Type".bold(),
        "Messages".bold()
    ]);
    for agent in &info.agents {
        table.add_row(prettytable::row![
            agent.name.cyan(),
            agent.kind,
            agent.memory_messages
        ]);
    }

    println!();
    table.printstd();
    println!();
}

fn print_sessions(rows: &[SessionRow]) {
    if rows.is_empty() {
        println!("{}", "No saved sessions found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "ID".bold(),
        "Date".bold(),
        "Time".bold(),
        "Messages".bold(),
        "Preview".bold()
    ]);

    for row in rows {
        let preview = if row.preview.is_empty() {
            "-".to_string()
        } else {
            truncate(&row.preview, PREVIEW_WIDTH)
        };
        table.add_row(prettytable::row![
            row.id.cyan(),
            row.date_label,
            row.time_label,
            row.message_count,
            preview
        ]);
    }

    println!("\nSaved Sessions:");
    table.printstd();
    println!();
    println!(
        "Use {} to restore a session.",
        "agentdesk sessions load <ID>".cyan()
    );
    println!();
}

fn print_detail(detail: &SessionDetail) {
    println!("\nSession {}\n", detail.session_id.cyan());
    if detail.agents.is_empty() {
        println!("{}", "No stored messages.".yellow());
        return;
    }

    for (agent, memory) in &detail.agents {
        println!("{} ({} messages)", agent.bold(), memory.message_count);
        for message in &memory.messages {
            let role = message
                .get("role")
                .and_then(|r| r.as_str())
                .unwrap_or("?");
            let content = message
                .get("content")
                .and_then(|c| c.as_str())
                .unwrap_or_default();
            println!("  {:<10} {}", role.dimmed(), truncate(content, 100));
        }
        println!();
    }
}

fn truncate(text: &str, width: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > width {
        let cut: String = line.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}
