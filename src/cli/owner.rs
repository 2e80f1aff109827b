//! Owner CLI commands
//!
//! Implements CLI commands for the owner register.

use clap::Subcommand;

use crate::display::{format_owner_details, format_owner_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::OwnerId;
use crate::services::OwnerService;
use crate::storage::Storage;

/// Owner subcommands
#[derive(Subcommand)]
pub enum OwnerCommands {
    /// List owners with their normalized shares
    List,
    /// Show one owner
    Show {
        /// Owner name or ID
        owner: String,
    },
    /// Register a new owner
    Add {
        /// Owner name
        name: String,
        /// Share held (a weight; shares are normalized against their sum)
        share: f64,
        /// Explicit owner ID (defaults to the next free one)
        #[arg(long)]
        id: Option<i64>,
    },
    /// Change an owner's share
    SetShare {
        /// Owner name or ID
        owner: String,
        /// New share held
        share: f64,
    },
}

/// Handle an owner command
pub fn handle_owner_command(storage: &Storage, cmd: OwnerCommands) -> LedgerResult<()> {
    let service = OwnerService::new(storage);

    match cmd {
        OwnerCommands::List => {
            let owners = service.list_with_shares()?;
            print!("{}", format_owner_list(&owners));
        }

        OwnerCommands::Show { owner } => {
            let found = service.require(&owner)?;
            let share = service
                .list_with_shares()?
                .into_iter()
                .find(|s| s.owner.id == found.id)
                .ok_or_else(|| LedgerError::owner_not_found(&owner))?;
            print!("{}", format_owner_details(&share));
        }

        OwnerCommands::Add { name, share, id } => {
            let owner = service.add(&name, share, id.map(OwnerId::new))?;
            println!("Added owner: {}", owner.name);
            println!("  ID:         {}", owner.id);
            println!("  Share Held: {}", owner.share_held);
        }

        OwnerCommands::SetShare { owner, share } => {
            let found = service.require(&owner)?;
            let updated = service.set_share(found.id, share)?;
            println!(
                "Updated {}: share {} -> {}",
                updated.name, found.share_held, updated.share_held
            );
            println!("Regenerate affected months for the change to reach the ledger.");
        }
    }

    Ok(())
}
