//! `aws-snippets iam ...`

use clap::Subcommand;

use super::Context;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum IamCommand {
    ListUsers,

    CreateUser { name: String },

    DeleteUser { name: String },

    ListRoles {
        /// e.g. /service-role/
        #[arg(long)]
        path_prefix: Option<String>,
    },
}

pub async fn run(command: IamCommand, ctx: &Context) -> Result<()> {
    let iam = ctx.iam();
    let out = &ctx.output;

    match command {
        IamCommand::ListUsers => out.emit_list(&iam.list_users().await?),
        IamCommand::CreateUser { name } => out.emit(&iam.create_user(&name).await?),
        IamCommand::DeleteUser { name } => {
            iam.delete_user(&name).await?;
            out.done(&format!("Deleted user {name}"))
        }
        IamCommand::ListRoles { path_prefix } => {
            out.emit_list(&iam.list_roles(path_prefix.as_deref()).await?)
        }
    }
}
