use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;
use resultmail::modules::results::ResultService;
use resultmail::modules::results::dispatcher::resolve_recipient;
use resultmail::modules::results::model::DeliveryRequest;
use resultmail::modules::results::renderer::{DocumentInfo, build_pdf, compose_lines};
use resultmail::utils::email::SmtpMailer;
use resultmail_config::{ArtifactConfig, MailConfig};
use resultmail_core::LocalArtifactStore;
use validator::Validate;

#[derive(Parser)]
#[command(name = "resultmail-cli")]
#[command(about = "Result Mailer CLI - Render and deliver student results", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a result PDF locally without sending it
    Render {
        /// Delivery request JSON (same body as POST /api/results/send)
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Where to write the PDF
        #[arg(short = 'o', long)]
        output: PathBuf,
    },
    /// Render and email a result using the configured SMTP relay
    Send {
        /// Delivery request JSON (same body as POST /api/results/send)
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render { input, output } => handle_render(&input, &output),
        Commands::Send { input, yes } => handle_send(&input, yes).await,
    };

    if let Err(e) = result {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

fn load_request(input: &Path) -> anyhow::Result<DeliveryRequest> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let request: DeliveryRequest = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid delivery request", input.display()))?;
    request
        .validate()
        .with_context(|| format!("{} is incomplete", input.display()))?;
    Ok(request)
}

fn handle_render(input: &Path, output: &Path) -> anyhow::Result<()> {
    let request = load_request(input)?;
    let student = &request.student_details;

    let lines = compose_lines(student, &request.marks);
    let bytes = build_pdf(&lines, &DocumentInfo::for_student(student))?;

    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("\n✅ Result rendered");
    println!("   Enrollment No: {}", student.enrollment_no());
    println!("   Output: {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}

async fn handle_send(input: &Path, yes: bool) -> anyhow::Result<()> {
    let request = load_request(input)?;
    let student = &request.student_details;

    let Some(recipient) = resolve_recipient(student) else {
        bail!("Neither parentEmail nor email is set for {}", student.enrollment_no());
    };

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Send the result of {} to {}?",
                student.enrollment_no(),
                recipient
            ))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;

        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let mail_config = MailConfig::from_env().context("Invalid mail configuration")?;
    let artifact_config = ArtifactConfig::from_env();

    let store = Arc::new(LocalArtifactStore::new(artifact_config.dir));
    let mailer = Arc::new(SmtpMailer::new(&mail_config)?);
    let service = ResultService::new(store, mailer);

    let outcome = service.deliver(&request).await?;

    println!("\n✅ {}", outcome.message);
    println!("   Recipient: {}", recipient);
    Ok(())
}
