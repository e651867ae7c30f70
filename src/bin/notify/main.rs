#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends a templated notification from the command line

use std::{collections::BTreeSet, sync::Arc};

use anyhow::{anyhow, Result};
use clap::Parser;
use notifier::{
    domain::{
        communication::email_addresses::EmailAddress,
        notifications::{
            DispatchMode, Dispatcher, NotificationComposer, NotificationConfig,
            NotificationRequest, ResourceInliner, TemplateParams, TemplateRenderer,
        },
    },
    infrastructure::{
        email::smtp::{SMTPConfig, SMTPMailer},
        resources::filesystem::FilesystemResolver,
        templates::askama_engine::AskamaTemplateEngine,
    },
};
use serde_json::Value;
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The notification configuration
    #[clap(flatten)]
    pub notifications: NotificationConfig,

    /// The SMTP configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// The notification to send
    #[clap(flatten)]
    pub request: RequestArgs,
}

/// The notification to send
#[derive(Debug, Parser)]
pub struct RequestArgs {
    /// Recipient, may be repeated
    #[arg(long, required = true)]
    pub to: Vec<EmailAddress>,

    /// Sender, defaults to the configured default sender
    #[arg(long)]
    pub from: Option<EmailAddress>,

    /// Display name of the sender
    #[arg(long)]
    pub from_name: Option<String>,

    /// Address replies should go to
    #[arg(long)]
    pub reply_to: Option<EmailAddress>,

    /// Blind carbon copy recipient, may be repeated
    #[arg(long)]
    pub bcc: Vec<EmailAddress>,

    /// Send a blind copy to the reply-to (or sender) address
    #[arg(long)]
    pub copy_to_sender: bool,

    /// The subject
    #[arg(long, default_value = "")]
    pub subject: String,

    /// The template to render
    #[arg(long)]
    pub template: String,

    /// Template parameter as `key=value`; values that parse as JSON are passed as JSON
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, Value)>,
}

impl From<RequestArgs> for NotificationRequest {
    fn from(args: RequestArgs) -> Self {
        Self {
            to: args.to.into_iter().collect(),
            from: args.from,
            from_name: args.from_name,
            reply_to: args.reply_to,
            bcc: args.bcc.into_iter().collect::<BTreeSet<_>>(),
            copy_to_sender: args.copy_to_sender,
            subject: args.subject,
            template: args.template,
            params: args.params.into_iter().collect::<TemplateParams>(),
        }
    }
}

fn parse_param(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got \"{}\"", raw))?;

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    Ok((key.to_string(), value))
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let config = Arc::new(args.notifications);

    info!(
        "templates available: {}",
        AskamaTemplateEngine::TEMPLATES.join(", ")
    );

    let composer = NotificationComposer::new(
        config.clone(),
        TemplateRenderer::new(Arc::new(AskamaTemplateEngine)),
        ResourceInliner::new(Arc::new(FilesystemResolver::new(
            config.resource_root.clone(),
        ))),
    );

    let dispatcher = Dispatcher::new(Arc::new(composer), Arc::new(SMTPMailer::new(args.smtp)));

    dispatcher
        .dispatch(args.request.into(), DispatchMode::Sync)
        .await?;

    Ok(())
}
