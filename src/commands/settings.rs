use crate::cli::SettingsCommand;
use crate::client::ProviderSettings;
use crate::commands::backend;
use crate::config::Config;
use crate::controllers::{
    ConnectionProbe, NoticeKind, ProbeStatus, ProviderSettingsController, SettingsField,
};
use crate::error::Result;
use crate::providers::ProviderKind;
use colored::Colorize;
use prettytable::{row, Table};

/// Handle settings commands
pub async fn handle_settings(config: &Config, command: SettingsCommand) -> Result<()> {
    let controller = ProviderSettingsController::new(backend(config)?);

    match command {
        SettingsCommand::Show => {
            if controller.load_settings().await.is_err() {
                print_defaults_note();
            }
            print_settings(&controller.draft(), controller.hint());
        }
        SettingsCommand::Check { provider, address } => {
            if let Err(e) = controller.load_settings().await {
                tracing::debug!("Checking connection with default settings: {:#}", e);
                print_defaults_note();
            }
            if let Some(provider) = provider {
                controller.update_field(SettingsField::ProviderName(provider));
            }
            if let Some(address) = address {
                controller.update_field(SettingsField::ServerAddress(address));
            }
            let probe = controller.check_connection().await?;
            print_probe(&controller.draft(), &probe);
        }
        SettingsCommand::Set {
            provider,
            model,
            address,
            local,
        } => {
            // Unset fields keep their saved values, so the saved values must be known
            controller.load_settings().await?;

            if let Some(provider) = provider {
                if local.is_none() {
                    if let Some(kind) = ProviderKind::parse_str(&provider) {
                        controller.update_field(SettingsField::IsLocal(kind.is_local_by_default()));
                    }
                }
                controller.update_field(SettingsField::ProviderName(provider));
            }
            if let Some(model) = model {
                controller.update_field(SettingsField::Model(model));
            }
            if let Some(address) = address {
                controller.update_field(SettingsField::ServerAddress(address));
            }
            if let Some(local) = local {
                controller.update_field(SettingsField::IsLocal(local));
            }

            let result = controller.save_settings().await;
            if let Some(notice) = controller.notice() {
                match notice.kind {
                    NoticeKind::Success => println!("{}", notice.message.green()),
                    NoticeKind::Error => eprintln!("{}", notice.message.red()),
                }
            }
            result?;
            print_settings(&controller.draft(), controller.hint());
        }
    }

    Ok(())
}

fn print_settings(settings: &ProviderSettings, hint: &str) {
    let model = if settings.provider_model.is_empty() {
        "-"
    } else {
        settings.provider_model.as_str()
    };

    println!("\nLLM Provider Settings\n");
    println!("Provider:       {}", settings.provider_name.cyan());
    println!("Model:          {}", model);
    println!("Server Address: {}", settings.provider_server_address);
    println!(
        "Local:          {}",
        if settings.is_local { "Yes" } else { "No" }
    );
    println!();
    println!("{}", hint.dimmed());
    println!();
}

fn print_defaults_note() {
    println!(
        "{}",
        "Could not read settings from the backend; showing defaults.".yellow()
    );
}

fn print_probe(settings: &ProviderSettings, probe: &ConnectionProbe) {
    let status = match probe.status {
        ProbeStatus::Connected => probe.status.as_str().green(),
        ProbeStatus::Disconnected => probe.status.as_str().yellow(),
        ProbeStatus::Error => probe.status.as_str().red(),
        ProbeStatus::Unknown | ProbeStatus::Checking => probe.status.as_str().normal(),
    };

    println!(
        "\n{} at {}: {}",
        settings.provider_name.cyan(),
        settings.provider_server_address,
        status
    );
    if let Some(message) = &probe.message {
        println!("{}", message);
    }

    if probe.models.is_empty() {
        println!();
        return;
    }

    let mut table = Table::new();
    table.add_row(row!["Available Models"]);
    for model in &probe.models {
        table.add_row(row![model]);
    }
    println!();
    table.printstd();
    println!();
}
