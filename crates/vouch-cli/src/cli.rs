//! CLI argument parsing

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use std::io::Read;
use std::path::PathBuf;
use vouch::{Chain, Domain, RuleConfiguration, ValidationFailure, Validator};

/// Validate a JSON document against a vouch rule configuration
#[derive(Parser, Debug)]
#[command(name = "vouch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON document to validate; reads stdin when omitted or `-`
    pub input: Option<PathBuf>,

    /// Rule configuration file (JSON)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Domain the document is validated in
    #[arg(short, long, value_enum)]
    pub domain: DomainArg,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Label prefixed to every finding; overrides `name` from the rules
    #[arg(short, long)]
    pub label: Option<String>,

    /// Log engine events to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainArg {
    String,
    Number,
    Object,
    Array,
}

impl From<DomainArg> for Domain {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::String => Domain::String,
            DomainArg::Number => Domain::Number,
            DomainArg::Object => Domain::Object,
            DomainArg::Array => Domain::Array,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed,
}

impl Cli {
    /// Execute the validation run
    pub fn execute(self) -> Result<Verdict> {
        let validator = self.validator()?;
        let document = self.read_document()?;
        let domain = Domain::from(self.domain);

        tracing::debug!(%domain, "validating document");
        let report = match validator.run(document, domain) {
            Ok(chain) => Report::Session(chain),
            Err(failure) => Report::Raised(failure),
        };
        report.print(self.format)?;

        if report.is_empty() {
            eprintln!("{}", style("valid").green());
            Ok(Verdict::Passed)
        } else {
            eprintln!("{}", style(format!("{} finding(s)", report.len())).red());
            Ok(Verdict::Failed)
        }
    }

    fn validator(&self) -> Result<Validator> {
        let mut config = match &self.rules {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read rules from {}", path.display()))?;
                RuleConfiguration::from_json_str(&text)
                    .with_context(|| format!("invalid rules in {}", path.display()))?
            }
            None => RuleConfiguration::default(),
        };
        if let Some(label) = &self.label {
            config.name = Some(label.clone());
        }
        Ok(Validator::new(config)?)
    }

    fn read_document(&self) -> Result<serde_json::Value> {
        let text = match &self.input {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            _ => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read stdin")?;
                text
            }
        };
        serde_json::from_str(&text).context("document is not valid JSON")
    }
}

/// Findings of a finished session, or of one cut short by throw-mode.
enum Report {
    Session(Chain),
    Raised(ValidationFailure),
}

impl Report {
    fn findings(&self) -> &[vouch::Finding] {
        match self {
            Report::Session(chain) => chain.report(),
            Report::Raised(failure) => failure.findings(),
        }
    }

    fn len(&self) -> usize {
        self.findings().len()
    }

    fn is_empty(&self) -> bool {
        self.findings().is_empty()
    }

    fn print(&self, format: Format) -> Result<()> {
        match format {
            Format::Json => println!("{}", serde_json::to_string_pretty(self.findings())?),
            Format::Text if !self.is_empty() => {
                println!("{}", vouch::finding::render_text(self.findings()))
            }
            Format::Text => {}
        }
        Ok(())
    }
}
