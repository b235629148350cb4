use clap::Parser;
use colored::Colorize;
use group_source::cmd::group_source::{self as group_source_cmd, ReportArgs};
use group_source::error;

#[derive(Parser, Debug)]
#[command(
    name = "group-source",
    about = "Classify Entra ID groups as cloud-only or synchronized from on-premises AD",
    version,
    long_about = "Looks up each group by display name in Microsoft Graph and reports whether it is\n\
                  cloud-only or synchronized from on-premises Active Directory.\n\n\
                  Requires AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET for an app\n\
                  registration with Group.Read.All application permission."
)]
struct Cli {
    #[command(flatten)]
    report: ReportArgs,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> error::Result<()> {
    let cli = Cli::parse();

    if cli.report.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("group_source=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    group_source_cmd::run(cli.report).await
}
