pub mod export;
pub mod init;
pub mod register;
pub mod registrations;
pub mod remind;
pub mod session;

use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Manage the session catalog")]
    Session(session::SessionArgs),
    #[command(about = "Submit a registration", arg_required_else_help = true)]
    Register(register::RegisterArgs),
    #[command(about = "List registrations")]
    Registrations(registrations::RegistrationsArgs),
    #[command(about = "Send reminder emails for upcoming sessions")]
    Remind(remind::RemindArgs),
    #[command(about = "Export registrations and sessions")]
    Export(export::ExportArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> anyhow::Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Session(args) => session::cmd(args),
            Commands::Register(args) => register::cmd(args).await,
            Commands::Registrations(args) => registrations::cmd(args),
            Commands::Remind(args) => remind::cmd(args).await,
            Commands::Export(args) => export::cmd(args),
        }
    }
}
