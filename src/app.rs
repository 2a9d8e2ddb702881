use std::process::ExitCode;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use tracing::info;

use crate::bridge::{Bridge, Outcome, Trigger};
use crate::cli::args::{CliArgs, Command, ProductFields};
use crate::cli::validation;
use crate::config::{self, BridgeConfig, ConfigFile, DEFAULT_API_BASE_URL, DEFAULT_USER_AGENT};
use crate::dom::{self, MemoryDom, TerminalDom, RESULT_OUTPUT};

/// Form values to place on the page and the trigger that submits them.
#[derive(Clone, Debug, PartialEq)]
pub struct FormSubmission {
    pub trigger: Trigger,
    pub fields: Vec<(&'static str, String)>,
}

impl FormSubmission {
    fn new(trigger: Trigger, fields: Vec<(&'static str, String)>) -> Self {
        Self { trigger, fields }
    }

    pub fn to_dom(&self) -> MemoryDom {
        let page = MemoryDom::new();
        for (id, value) in self.fields.iter() {
            page.set_value(id, value);
        }
        page
    }
}

fn product_fields(
    ids: [&'static str; 5],
    fields: &ProductFields,
) -> Vec<(&'static str, String)> {
    let [name, category, quantity, stock, price] = ids;
    vec![
        (name, fields.name.clone()),
        (category, fields.category.clone()),
        (quantity, fields.quantity.clone()),
        (stock, fields.stock.clone()),
        (price, fields.price.clone()),
    ]
}

/// Maps a subcommand onto the page form it stands for. `None` for commands
/// that do not submit anything.
pub fn form_for(command: &Command) -> Option<FormSubmission> {
    let submission = match command {
        Command::ViewAll => FormSubmission::new(Trigger::ViewAll, vec![]),
        Command::Search { keyword } => {
            FormSubmission::new(Trigger::Search, vec![(dom::KEYWORD, keyword.clone())])
        }
        Command::Category { category } => {
            FormSubmission::new(Trigger::Category, vec![(dom::CATEGORY, category.clone())])
        }
        Command::Stock { stock } => {
            FormSubmission::new(Trigger::Stock, vec![(dom::STOCK, stock.clone())])
        }
        Command::Price {
            min_price,
            max_price,
        } => FormSubmission::new(
            Trigger::PriceRange,
            vec![
                (dom::MIN_PRICE, min_price.clone()),
                (dom::MAX_PRICE, max_price.clone()),
            ],
        ),
        Command::Add(fields) => FormSubmission::new(
            Trigger::AddProduct,
            product_fields(
                [
                    dom::PRODUCT_NAME,
                    dom::PRODUCT_CATEGORY,
                    dom::PRODUCT_QUANTITY,
                    dom::PRODUCT_STOCK,
                    dom::PRODUCT_PRICE,
                ],
                fields,
            ),
        ),
        Command::FindName { name } => {
            FormSubmission::new(Trigger::ByName, vec![(dom::LOOKUP_NAME, name.clone())])
        }
        Command::Update { id, fields } => {
            let mut values = vec![(dom::UPDATE_ID, id.clone())];
            values.extend(product_fields(
                [
                    dom::UPDATE_NAME,
                    dom::UPDATE_CATEGORY,
                    dom::UPDATE_QUANTITY,
                    dom::UPDATE_STOCK,
                    dom::UPDATE_PRICE,
                ],
                fields,
            ));
            FormSubmission::new(Trigger::UpdateProduct, values)
        }
        Command::Delete { id } => {
            FormSubmission::new(Trigger::DeleteProduct, vec![(dom::DELETE_ID, id.clone())])
        }
        Command::InitConfig => return None,
    };
    Some(submission)
}

#[derive(Clone, Debug)]
struct RunConfig {
    bridge: BridgeConfig,
    submission: FormSubmission,
    no_color: bool,
    raw: bool,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let api_base_url = args
        .api
        .or(cfg.api_base_url)
        .map(|u| u.trim().to_string())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    validation::validate_api_url(&api_base_url)
        .map_err(|e| format!("invalid api_base_url '{api_base_url}': {e}"))?;

    let timeout = match args.timeout.or(cfg.timeout) {
        Some(0) => return Err("invalid timeout, expected positive number of seconds".to_string()),
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    };
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());
    let user_agent = cfg
        .user_agent
        .filter(|ua| !ua.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    let submission = form_for(&args.command)
        .ok_or_else(|| "command does not submit a form".to_string())?;

    Ok(RunConfig {
        bridge: BridgeConfig {
            api_base_url,
            timeout,
            proxy,
            user_agent,
            output_id: RESULT_OUTPUT.to_string(),
        },
        submission,
        no_color,
        raw: args.raw,
        verbose: args.verbose,
    })
}

async fn run_async(run: RunConfig) -> Result<ExitCode, String> {
    let page = TerminalDom::new(run.submission.to_dom(), !run.no_color, run.raw);
    let bridge = Bridge::new(page, &run.bridge).map_err(|e| e.to_string())?;
    info!(
        api = %bridge.client().base_url(),
        element = run.submission.trigger.element_id(),
        "submitting"
    );

    match bridge.dispatch(run.submission.trigger).await {
        Outcome::Rendered | Outcome::Superseded => Ok(ExitCode::SUCCESS),
        Outcome::Failed => Ok(ExitCode::from(2)),
        Outcome::Skipped => Err(format!(
            "no request sent: {} needs non-empty text and valid numbers",
            run.submission.trigger.element_id()
        )),
    }
}

fn init_config(explicit: Option<String>) -> Result<ExitCode, String> {
    let path = match explicit {
        Some(p) => config::expand_tilde(&p),
        None => config::default_config_path()
            .ok_or_else(|| "could not determine home directory".to_string())?,
    };
    if config::ensure_default_config_file(&path)? {
        println!(":: Config    : wrote {}", path.display());
    } else {
        println!(":: Config    : {} already exists", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

pub fn run_cli() -> Result<ExitCode, String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return Ok(ExitCode::SUCCESS);
            }
            _ => return Err(e.to_string()),
        },
    };

    if let Command::InitConfig = args.command {
        return init_config(args.config);
    }

    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    if run.no_color {
        colored::control::set_override(false);
    }
    crate::logging::init(run.verbose, run.no_color);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
