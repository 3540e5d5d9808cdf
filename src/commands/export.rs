//! Data export command.

use crate::libs::export::{ExportData, ExportFormat, Exporter};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Which dataset to export
    #[arg(long, value_enum, default_value = "registrations")]
    data: ExportData,
    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    format: ExportFormat,
    /// Narrow registration exports to one session
    #[arg(long)]
    session: Option<String>,
    /// Output file path; defaults to evreg_<data>_<date>.<ext>
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    Exporter::new(args.format, args.output).export(args.data, args.session.as_deref())
}
