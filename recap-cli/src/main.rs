use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use recap_cli::paths;
use recap_cli::{
    ArchiveService, CliHost, ContentDelegate, HandlerOutcome, HostEvent, HttpArchiveClient,
    HttpPortalTransport, MarkupUi, NavigationHistory, NoOpArchive, PageContext, PageMarkup,
    RecapConfig, Services,
};

// Status lines go to stderr; stdout carries only the page or JSON a command produces.

#[derive(Parser)]
#[command(name = "recap")]
#[command(about = "Recognize court-records portal pages and contribute them to the RECAP archive")]
struct Args {
    /// Path to custom config file (YAML format)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print what the page at a URL is and which identifiers it carries
    Classify {
        #[arg(short, long)]
        url: String,

        /// Saved page HTML; without it only the URL is considered
        #[arg(short, long)]
        page: Option<String>,
    },

    /// Run the matching page handler against a saved page
    Run {
        #[arg(short, long)]
        url: String,

        #[arg(short, long)]
        page: String,

        /// Raw `Cookie` header of the portal session
        #[arg(long)]
        cookie: Option<String>,

        /// Where to write the page after handling (printed to stdout otherwise)
        #[arg(short, long)]
        output: Option<String>,

        /// Also write a JSON summary of the handler outcomes here
        #[arg(long)]
        summary: Option<String>,

        /// Directory for documents the host has to save
        #[arg(long)]
        output_dir: Option<String>,

        /// Save captured documents instead of showing them inline
        #[arg(long)]
        no_inline_pdf: bool,

        /// Simulate the user submitting this receipt form
        #[arg(long)]
        submit: Option<String>,

        /// Talk to nothing: archive lookups come back empty and uploads are not sent
        #[arg(long)]
        dry_run: bool,
    },

    /// Show available config options and exit
    ShowConfigs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    eprintln!("🦀 RECAP page handler");

    let config = load_config(args.config.as_deref());

    match args.command {
        Command::Classify { url, page } => classify(&config, &url, page.as_deref()),
        Command::Run {
            url,
            page,
            cookie,
            output,
            summary,
            output_dir,
            no_inline_pdf,
            submit,
            dry_run,
        } => {
            let run = RunArgs {
                url,
                page,
                cookie,
                output,
                summary,
                output_dir,
                inline_pdf: !no_inline_pdf,
                submit,
                dry_run,
            };
            run_page(&config, run).await
        }
        Command::ShowConfigs => {
            show_help();
            Ok(())
        }
    }
}

struct RunArgs {
    url: String,
    page: String,
    cookie: Option<String>,
    output: Option<String>,
    summary: Option<String>,
    output_dir: Option<String>,
    inline_pdf: bool,
    submit: Option<String>,
    dry_run: bool,
}

fn load_config(explicit: Option<&str>) -> RecapConfig {
    match paths::resolve_config(explicit) {
        Some(path) => {
            let path = path.to_string_lossy();
            eprintln!("📋 Loaded config from: {}", path);
            RecapConfig::load_with_fallback(Some(&path))
        }
        None => {
            eprintln!("📋 Using default config");
            RecapConfig::default()
        }
    }
}

fn read_page(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read page from {}", path))
}

fn classify(config: &RecapConfig, url: &str, page: Option<&str>) -> Result<()> {
    let html = match page {
        Some(path) => read_page(path)?,
        None => String::new(),
    };
    let mut markup = PageMarkup::new(html);
    let context = PageContext::from_page(url, &mut markup, config);
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}

async fn run_page(config: &RecapConfig, args: RunArgs) -> Result<()> {
    if !Path::new(&args.page).exists() {
        eprintln!("⚠️  Page not found at: {}", args.page);
        eprintln!("   Please check the file path.");
        return Ok(());
    }
    let html = read_page(&args.page)?;

    let archive: Box<dyn ArchiveService> = if args.dry_run {
        eprintln!("🧪 Dry run: no archive requests will be made");
        Box::new(NoOpArchive)
    } else {
        Box::new(HttpArchiveClient::new(config.archive.clone())?)
    };
    let portal = HttpPortalTransport::new(args.cookie.clone())?;
    let host = CliHost::new(
        args.cookie.as_deref(),
        args.inline_pdf,
        paths::output_dir(args.output_dir.as_deref()),
    );
    let ui = MarkupUi;
    let services = Services {
        archive: archive.as_ref(),
        ui: &ui,
        host: &host,
        portal: &portal,
    };

    eprintln!("📄 Handling: {}", args.url);
    let mut delegate =
        ContentDelegate::from_page(&args.url, html, NavigationHistory::new(), config, services);
    eprintln!("🏷️  Page type: {:?}", delegate.context().classification());
    if delegate.context().restricted() {
        eprintln!("🔒 Restricted page: nothing will be uploaded");
    }

    let mut outcomes = delegate.run().await;

    if let Some(form_id) = &args.submit {
        eprintln!("📨 Submitting form: {}", form_id);
        outcomes.push(delegate.on_document_view_submit(form_id).await);
    }
    delegate.dispose_listeners();

    report(&outcomes, &host.events());
    if let Some(path) = &args.summary {
        save_summary(&args.url, delegate.context(), &outcomes, path)?;
    }
    save_page(delegate.page().html(), args.output.as_deref())?;
    Ok(())
}

fn report(outcomes: &[HandlerOutcome], events: &[HostEvent]) {
    eprintln!("📊 Outcomes:");
    for outcome in outcomes {
        let marker = match outcome {
            HandlerOutcome::Skipped(_) => "⏭️ ",
            HandlerOutcome::UploadFailed => "❌",
            HandlerOutcome::Uploaded | HandlerOutcome::Captured(_) => "✅",
            _ => "  -",
        };
        eprintln!("   {} {:?}", marker, outcome);
    }

    for event in events {
        match event {
            HostEvent::Saved(path) => eprintln!("💾 Document saved to: {}", path.display()),
            HostEvent::Navigated(url) => eprintln!("🔗 Navigate to: {}", url),
            HostEvent::ResumedNativeSubmission { form_id, action } => {
                eprintln!("↩️  Form {} handed back to the portal ({})", form_id, action)
            }
        }
    }
}

fn save_page(html: &str, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, html).with_context(|| format!("Failed to write page to {}", path))?;
            eprintln!("💾 Page saved to: {}", path);
        }
        None => println!("{}", html),
    }
    Ok(())
}

/// Quick reference of one run for scripts
fn save_summary(
    url: &str,
    context: &PageContext,
    outcomes: &[HandlerOutcome],
    path: &str,
) -> Result<()> {
    let summary = serde_json::json!({
        "url": url,
        "handled_at": chrono::Utc::now().to_rfc3339(),
        "page": context,
        "outcomes": outcomes,
    });
    std::fs::write(path, serde_json::to_string_pretty(&summary)?)
        .with_context(|| format!("Failed to write summary to {}", path))?;
    eprintln!("💾 Summary saved to: {}", path);
    Ok(())
}

fn show_help() {
    println!("\n📋 Available Configuration Options:");
    println!("  archive.base_url            Archive API root (default: https://www.courtlistener.com)");
    println!("  archive.api_token           Token sent as `Authorization: Token ...` with every request");
    println!("  archive.upload_enabled      Contribute pages and documents (default: true)");
    println!("  portal.extra_hosts          Extra portal hosts as {{host, court}} pairs");
    println!("  options.recap_link_popups   Open archive links through a popup (default: false)");
    println!("  restriction.warning_phrase  Text marking a filing as restricted");
    println!("  restriction.sealed_marker   Text marking a filing as sealed");
    println!("  filenames.style             lawyer or internet_archive");

    println!("\n📁 Config lookup order:");
    println!("  1. --config <path>");
    println!("  2. $XDG_CONFIG_HOME/recap/config.yaml (or the platform config dir)");
    println!("  3. Built-in defaults");

    println!("\n📝 Usage Examples:");
    println!("  recap classify --url 'https://ecf.canb.uscourts.gov/cgi-bin/DktRpt.pl?531591'");
    println!("  recap run --url <URL> --page docket.html --cookie 'PacerSession=...' --dry-run");
    println!("  recap run --url <URL> --page receipt.html --cookie 'PacerSession=...' --submit <FORM_ID>");
}
