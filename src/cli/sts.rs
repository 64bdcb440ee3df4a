//! `aws-snippets sts ...`

use clap::Subcommand;

use super::Context;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum StsCommand {
    /// Show the account and principal behind the current credentials
    GetCallerIdentity,

    /// Assume a role and summarize the temporary credentials
    AssumeRole {
        role_arn: String,
        #[arg(long, default_value = "aws-snippets")]
        session_name: String,
        /// Credential lifetime in seconds (900 to the role's maximum)
        #[arg(long)]
        duration_seconds: Option<i32>,
    },
}

pub async fn run(command: StsCommand, ctx: &Context) -> Result<()> {
    let sts = ctx.sts();
    let out = &ctx.output;

    match command {
        StsCommand::GetCallerIdentity => out.emit(&sts.get_caller_identity().await?),
        StsCommand::AssumeRole {
            role_arn,
            session_name,
            duration_seconds,
        } => out.emit(
            &sts.assume_role(&role_arn, &session_name, duration_seconds)
                .await?,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    #[test]
    fn test_parse_assume_role_defaults() {
        let cli = Cli::try_parse_from([
            "aws-snippets",
            "sts",
            "assume-role",
            "arn:aws:iam::123456789012:role/reader",
        ])
        .unwrap();

        match cli.command {
            Command::Sts(StsCommand::AssumeRole {
                session_name,
                duration_seconds,
                ..
            }) => {
                assert_eq!(session_name, "aws-snippets");
                assert!(duration_seconds.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
