
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use forms::builder::FormBuilder;
use forms::engine::{Action, FieldInput, FormEngine};
use forms::error::{ErrorCode, FormError, StoreError};
use forms::registry::WidgetKind;
use forms::render::RenderMode;
use forms::schema::{DefaultValue, FieldSchema, FieldType, FormConfig, PartialFieldSchema};
use forms::session::FieldValue;
use forms::store::{FormStore, JsonFileStore};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("[{}] {}", .0.error_code(), .0)]
    Form(#[from] FormError),
    #[error("[{}] {}", .0.error_code(), .0)]
    Store(#[from] StoreError),
    #[error("no field named `{0}`")]
    UnknownName(String),
    #[error("unsupported value for `{0}`; expected a string, number, boolean, or list of strings")]
    UnsupportedValue(String),
    #[error("submission blocked: {0} field error(s)")]
    Blocked(usize),
}

#[derive(Parser, Debug)]
#[command(name = "forms-cli", about = "Check, render, and build schema-driven forms")]
struct Cli {
    #[arg(long, env = "FORMS_STORE_DIR", default_value = "./form-store")]
    store_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mount a form in submit mode and report configuration errors.
    Check { form: PathBuf },
    /// Print the rendered tree as JSON.
    Render {
        form: PathBuf,
        #[arg(long, default_value_t = false)]
        edit: bool,
    },
    /// Feed name -> value inputs and submit.
    Submit {
        form: PathBuf,
        #[arg(long)]
        values: PathBuf,
    },
    Builder(BuilderCommand),
}

#[derive(Args, Debug)]
struct BuilderCommand {
    #[command(subcommand)]
    command: BuilderSubcommand,
}

#[derive(Subcommand, Debug)]
enum BuilderSubcommand {
    New {
        #[arg(long, default_value = "Untitled Form")]
        title: String,
    },
    Add {
        form_id: String,
        #[arg(long = "type")]
        field_type: FieldType,
    },
    Set {
        form_id: String,
        field_id: String,
        #[arg(long)]
        default_value: String,
    },
    Remove {
        form_id: String,
        field_id: String,
    },
    Show {
        form_id: String,
    },
    List,
}

/// A form file holds either a full saved config or a bare field list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FormSource {
    Config(FormConfig),
    Fields(Vec<FieldSchema>),
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Check { form } => run_check(&form),
        Command::Render { form, edit } => run_render(&form, edit),
        Command::Submit { form, values } => run_submit(&form, &values),
        Command::Builder(builder) => {
            let mut store = JsonFileStore::open(&cli.store_dir)?;
            run_builder(&mut store, builder)
        }
    }
}

fn run_check(path: &Path) -> Result<(), CliError> {
    mount(path, RenderMode::SubmitEnabled)?;
    println!("ok");
    Ok(())
}

fn run_render(path: &Path, edit: bool) -> Result<(), CliError> {
    let mode = if edit { RenderMode::EditOnly } else { RenderMode::SubmitEnabled };
    let engine = mount(path, mode)?;
    print_json(&serde_json::to_value(engine.render())?)
}

fn run_submit(form: &Path, values: &Path) -> Result<(), CliError> {
    let mut engine = mount(form, RenderMode::SubmitEnabled)?;
    let inputs: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&read(values)?)?;

    for (name, raw) in inputs {
        let field = engine
            .fields()
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| CliError::UnknownName(name.clone()))?;
        // Unrendered fields take no input.
        let Ok(strategy) = engine.registry().resolve(&field.field_type) else {
            continue;
        };
        let value = to_field_value(&name, raw)?;
        let id = field.id.clone();
        for input in to_inputs(strategy.widget, value) {
            engine.input(&id, input)?;
        }
    }

    for action in engine.submit() {
        match action {
            Action::Submitted(values) => return print_json(&serde_json::to_value(values)?),
            Action::SubmitBlocked(errors) => {
                print_json(&serde_json::to_value(&errors)?)?;
                return Err(CliError::Blocked(errors.len()));
            }
            Action::FieldChanged(_) | Action::RenderNeeded => {}
        }
    }
    Ok(())
}

fn run_builder(store: &mut impl FormStore, builder: BuilderCommand) -> Result<(), CliError> {
    match builder.command {
        BuilderSubcommand::New { title } => {
            let builder = FormBuilder::new(title);
            builder.save(store)?;
            println!("{}", builder.config().id);
            Ok(())
        }
        BuilderSubcommand::Add { form_id, field_type } => {
            let mut builder = FormBuilder::from_config(store.load(&form_id)?);
            let field_id = builder.add_field(field_type);
            builder.save(store)?;
            println!("{field_id}");
            Ok(())
        }
        BuilderSubcommand::Set { form_id, field_id, default_value } => {
            let mut builder = FormBuilder::from_config(store.load(&form_id)?);
            let partial = PartialFieldSchema {
                default_value: Some(parse_default(default_value)),
                ..Default::default()
            };
            builder.update_field(&field_id, &partial)?;
            builder.save(store)?;
            print_json(&serde_json::to_value(builder.config().field(&field_id))?)
        }
        BuilderSubcommand::Remove { form_id, field_id } => {
            let mut builder = FormBuilder::from_config(store.load(&form_id)?);
            builder.remove_field(&field_id)?;
            builder.save(store)?;
            println!("removed {field_id}");
            Ok(())
        }
        BuilderSubcommand::Show { form_id } => print_json(&serde_json::to_value(store.load(&form_id)?)?),
        BuilderSubcommand::List => {
            for config in store.list()? {
                println!("{}\t{}\t{} field(s)", config.id, config.title, config.fields.len());
            }
            Ok(())
        }
    }
}

// --- Helpers ---

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.display().to_string(), source })
}

fn load_form(text: &str) -> Result<FormConfig, CliError> {
    Ok(match serde_json::from_str::<FormSource>(text)? {
        FormSource::Config(config) => config,
        FormSource::Fields(fields) => {
            let mut config = FormConfig::new("Untitled Form");
            config.fields = fields;
            config
        }
    })
}

fn mount(path: &Path, mode: RenderMode) -> Result<FormEngine, CliError> {
    let config = load_form(&read(path)?)?;
    Ok(FormEngine::from_config(&config, mode)?)
}

/// Numbers become their control text; other JSON shapes map one to one.
fn to_field_value(name: &str, raw: serde_json::Value) -> Result<FieldValue, CliError> {
    use serde_json::Value;
    match raw {
        Value::String(s) => Ok(FieldValue::Text(s)),
        Value::Bool(b) => Ok(FieldValue::Bool(b)),
        Value::Number(n) => n
            .as_f64()
            .map(|n| FieldValue::Text(DefaultValue::Number(n).display()))
            .ok_or_else(|| CliError::UnsupportedValue(name.to_owned())),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(CliError::UnsupportedValue(name.to_owned())),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::List),
        Value::Null | Value::Object(_) => Err(CliError::UnsupportedValue(name.to_owned())),
    }
}

/// Translate a submitted value into the inputs a user of `widget` would have
/// produced. Shapes the widget cannot produce pass through unchanged and are
/// rejected by the engine.
fn to_inputs(widget: WidgetKind, value: FieldValue) -> Vec<FieldInput> {
    match (widget, value) {
        (_, FieldValue::Text(s)) => vec![FieldInput::Text(s)],
        (_, FieldValue::Bool(b)) => vec![FieldInput::Checked(b)],
        (WidgetKind::MultiChoice, FieldValue::List(items)) => {
            items.into_iter().map(|value| FieldInput::Toggle { value, checked: true }).collect()
        }
        (_, FieldValue::List(items)) => vec![FieldInput::Files(items)],
    }
}

/// JSON scalars keep their type; anything else is taken as text.
fn parse_default(raw: String) -> DefaultValue {
    match serde_json::from_str::<DefaultValue>(&raw) {
        Ok(value) => value,
        Err(_) => DefaultValue::Text(raw),
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
