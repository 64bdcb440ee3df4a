//! `aws-snippets lambda ...`

use clap::Subcommand;

use super::Context;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum LambdaCommand {
    ListFunctions,

    GetFunction { name: String },

    /// Invoke synchronously with a JSON payload
    Invoke {
        name: String,
        #[arg(default_value = "{}")]
        payload: String,
        /// Include the last 4 KB of the execution log
        #[arg(long)]
        tail_logs: bool,
    },
}

pub async fn run(command: LambdaCommand, ctx: &Context) -> Result<()> {
    let lambda = ctx.lambda();
    let out = &ctx.output;

    match command {
        LambdaCommand::ListFunctions => out.emit_list(&lambda.list_functions().await?),
        LambdaCommand::GetFunction { name } => out.emit(&lambda.get_function(&name).await?),
        LambdaCommand::Invoke {
            name,
            payload,
            tail_logs,
        } => out.emit(&lambda.invoke(&name, &payload, tail_logs).await?),
    }
}
