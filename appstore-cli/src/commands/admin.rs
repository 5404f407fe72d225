//! Catalog management for signed-in users.
//!
//! Every admin command restores the stored session and runs it through the
//! route guard for `/admin/apps` before touching the backend.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use client::{AppRoute, GuardDecision, SessionController, guard};
use shared::config::Config;
use shared::models::{AppDraft, AppRecord};

use super::{catalog::print_listing, restore_session};

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// List every catalog entry, including unpublished ones
    List,
    /// Create a catalog entry
    Create(DraftArgs),
    /// Update a catalog entry; omitted fields keep their current value
    Update {
        /// Identifier of the app to update
        id: String,

        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Delete a catalog entry
    Delete {
        /// Identifier of the app to delete
        id: String,
    },
}

/// Form fields of a catalog entry.
#[derive(Args, Debug, Default)]
pub struct DraftArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub summary: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub version: Option<String>,
    #[arg(long)]
    pub download_url: Option<String>,
}

impl DraftArgs {
    /// Overlays the provided flags on `draft`.
    pub fn apply(self, mut draft: AppDraft) -> AppDraft {
        let fields = [
            (self.name, &mut draft.name),
            (self.summary, &mut draft.summary),
            (self.description, &mut draft.description),
            (self.category, &mut draft.category),
            (self.version, &mut draft.version),
            (self.download_url, &mut draft.download_url),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        draft
    }
}

pub async fn run(config: &Config, command: AdminCommand) -> Result<()> {
    let session = restore_session(config).await?;
    authorize(&session)?;
    let client = session.client();

    match command {
        AdminCommand::List => {
            let apps = client
                .admin_list_apps()
                .await
                .context("failed to list apps")?;
            print_listing(&apps, "No apps in the catalog.");
        }
        AdminCommand::Create(args) => {
            let payload = args.apply(AppDraft::default()).validate()?;
            let created = client
                .admin_create_app(&payload)
                .await
                .context("failed to create app")?;
            report("Created", &payload.name, created.as_ref());
        }
        AdminCommand::Update { id, draft } => {
            let current = client
                .admin_list_apps()
                .await
                .context("failed to list apps")?
                .into_iter()
                .find(|app| app.id.as_deref() == Some(id.as_str()))
                .with_context(|| format!("no app with id {id}"))?;
            let payload = draft.apply(AppDraft::from_record(&current)).validate()?;
            let updated = client
                .admin_update_app(&id, &payload)
                .await
                .with_context(|| format!("failed to update app {id}"))?;
            report("Updated", &payload.name, updated.as_ref());
        }
        AdminCommand::Delete { id } => {
            client
                .admin_delete_app(&id)
                .await
                .with_context(|| format!("failed to delete app {id}"))?;
            println!("Deleted app {id}");
        }
    }
    Ok(())
}

fn authorize(session: &SessionController) -> Result<()> {
    match guard(&session.snapshot(), &AppRoute::AdminApps.path()) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Redirect { from, .. } => {
            bail!("{from} requires a signed-in session; run `appstore session login` first")
        }
        GuardDecision::Pending => bail!("session is still being restored"),
    }
}

fn report(action: &str, name: &str, record: Option<&AppRecord>) {
    match record.and_then(|record| record.id.as_deref()) {
        Some(id) => println!("{action} app {name} ({id})"),
        None => println!("{action} app {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_fields_that_were_not_given() {
        let current = AppDraft {
            name: "Neon".into(),
            summary: "Glows".into(),
            version: "1.0".into(),
            ..AppDraft::default()
        };
        let args = DraftArgs {
            version: Some("1.1".into()),
            ..DraftArgs::default()
        };

        let draft = args.apply(current);
        assert_eq!(draft.name, "Neon");
        assert_eq!(draft.summary, "Glows");
        assert_eq!(draft.version, "1.1");
    }

    #[test]
    fn create_without_name_fails_validation() {
        let args = DraftArgs {
            summary: Some("Glows".into()),
            ..DraftArgs::default()
        };
        assert!(args.apply(AppDraft::default()).validate().is_err());
    }
}
