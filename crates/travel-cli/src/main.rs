use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Value, json};

use travel_cli::{
    config::{ConfigError, MirrorConfig, RuntimeConfig},
    logging,
    mirror_api::HttpMirror,
    render,
};
use travel_core::{
    CityFilter, CityStore, Coordinates, FileStorage, Importance, MirrorError, Mutation, NewCity,
    RemoteMirror, SyncOutcome, model::MapView, sync_collection,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Travel map CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Output mode: human text or v1 JSON envelope.
    #[arg(long, value_enum, global = true)]
    output: Option<OutputModeArg>,
    /// Shorthand for `--output json`.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List cities, optionally filtered.
    List {
        /// Case-insensitive match on city or country name.
        #[arg(long, default_value = "")]
        query: String,
        /// Only visited cities.
        #[arg(long)]
        visited: bool,
        /// Only custom cities.
        #[arg(long)]
        custom: bool,
        /// Map zoom level; hides cities too small for that view.
        #[arg(long)]
        zoom: Option<u8>,
    },
    /// Flip the visited flag of a city.
    Toggle { id: String },
    /// Rename a city.
    Rename { id: String, name: String },
    /// Add a custom city.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        country: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long)]
        emoji: Option<String>,
        #[arg(long, value_enum, default_value_t = ImportanceArg::Small)]
        importance: ImportanceArg,
        #[arg(long)]
        population: Option<u64>,
    },
    /// Remove a custom city.
    Remove { id: String },
    /// Show travel statistics.
    Stats,
    /// Push the full collection to the remote mirror.
    Sync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputModeArg {
    Human,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ImportanceArg {
    Major,
    Medium,
    Small,
}

impl From<ImportanceArg> for Importance {
    fn from(value: ImportanceArg) -> Self {
        match value {
            ImportanceArg::Major => Importance::Major,
            ImportanceArg::Medium => Importance::Medium,
            ImportanceArg::Small => Importance::Small,
        }
    }
}

const ENVELOPE_SCHEMA_VERSION: &str = "v1";
const ERROR_CODE_USER_INVALID_CONFIG: &str = "user.invalid_config";
const ERROR_CODE_USER_OUTPUT_MODE_CONFLICT: &str = "user.output_mode_conflict";
const ERROR_CODE_USER_MIRROR_NOT_CONFIGURED: &str = "user.mirror_not_configured";
const ERROR_CODE_RUNTIME_MIRROR_INIT: &str = "runtime.mirror_init_failed";
const ERROR_CODE_RUNTIME_MIRROR_SYNC: &str = "runtime.mirror_sync_failed";
const ERROR_CODE_RUNTIME_SERIALIZE: &str = "runtime.serialize_failed";

impl Cli {
    fn command_name(&self) -> &'static str {
        match &self.command {
            Commands::List { .. } => "travel.list",
            Commands::Toggle { .. } => "travel.toggle",
            Commands::Rename { .. } => "travel.rename",
            Commands::Add { .. } => "travel.add",
            Commands::Remove { .. } => "travel.remove",
            Commands::Stats => "travel.stats",
            Commands::Sync => "travel.sync",
        }
    }

    fn output_mode_hint(&self) -> OutputModeArg {
        if self.json {
            OutputModeArg::Json
        } else {
            self.output.unwrap_or(OutputModeArg::Human)
        }
    }

    fn output_mode(&self) -> Result<OutputModeArg, CliError> {
        match (self.output, self.json) {
            (Some(OutputModeArg::Human), true) => Err(CliError::user(
                ERROR_CODE_USER_OUTPUT_MODE_CONFLICT,
                "conflicting output mode flags: --json requires --output json (got human)",
            )),
            _ => Ok(self.output_mode_hint()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorKind {
    User,
    Runtime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliError {
    kind: ErrorKind,
    code: &'static str,
    message: String,
}

impl CliError {
    fn user(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::User,
            code,
            message: message.into(),
        }
    }

    fn runtime(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Runtime,
            code,
            message: message.into(),
        }
    }

    fn from_config(error: ConfigError) -> Self {
        Self::user(ERROR_CODE_USER_INVALID_CONFIG, error.to_string())
    }

    fn exit_code(&self) -> i32 {
        match self.kind {
            ErrorKind::User => 2,
            ErrorKind::Runtime => 1,
        }
    }

    fn kind_str(&self) -> &'static str {
        match self.kind {
            ErrorKind::User => "user",
            ErrorKind::Runtime => "runtime",
        }
    }
}

/// What a command produced, in both renderings.
struct CommandOutput {
    human: String,
    result: Value,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let command = cli.command_name();
    let mode = cli.output_mode_hint();

    match run(cli) {
        Ok(output) => println!("{output}"),
        Err(error) => {
            match mode {
                OutputModeArg::Json => println!("{}", serialize_service_error(command, &error)),
                OutputModeArg::Human => eprintln!("error: {}", error.message),
            }
            std::process::exit(error.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    run_with(cli, RuntimeConfig::from_env, open_http_mirror, Utc::now)
}

fn open_http_mirror(config: &MirrorConfig) -> Result<Box<dyn RemoteMirror>, MirrorError> {
    Ok(Box::new(HttpMirror::new(config)?))
}

fn run_with<LoadConfig, OpenMirror, Now>(
    cli: Cli,
    load_config: LoadConfig,
    open_mirror: OpenMirror,
    now_fn: Now,
) -> Result<String, CliError>
where
    LoadConfig: Fn() -> Result<RuntimeConfig, ConfigError>,
    OpenMirror: Fn(&MirrorConfig) -> Result<Box<dyn RemoteMirror>, MirrorError>,
    Now: Fn() -> DateTime<Utc>,
{
    let mode = cli.output_mode()?;
    let command = cli.command_name();
    let config = load_config().map_err(CliError::from_config)?;
    let mut store = CityStore::load_at(
        FileStorage::new(&config.data_dir),
        config.storage_key.as_str(),
        now_fn(),
    );

    let mirror_sync = |store: &CityStore<FileStorage>| -> Option<SyncOutcome> {
        let mirror_config = config.mirror.as_ref()?;
        let outcome = match open_mirror(mirror_config) {
            Ok(mirror) => sync_collection(
                mirror.as_ref(),
                &mirror_config.user_id,
                store.cities(),
                now_fn(),
            ),
            Err(error) => SyncOutcome {
                rows: 0,
                error: Some(error.to_string()),
            },
        };
        Some(outcome)
    };

    let output = match cli.command {
        Commands::List {
            query,
            visited,
            custom,
            zoom,
        } => {
            let filter = CityFilter {
                query,
                only_visited: visited,
                only_custom: custom,
                zoom,
            };
            let cities = store.search(&filter);
            let view = zoom.map(MapView::from_zoom);
            CommandOutput {
                human: render::city_list(&cities),
                result: json!({
                    "view": view.map(MapView::label),
                    "count": cities.len(),
                    "cities": cities,
                }),
            }
        }
        Commands::Stats => {
            let stats = store.stats();
            CommandOutput {
                human: render::stats_summary(&stats),
                result: to_value(&stats)?,
            }
        }
        Commands::Toggle { id } => {
            let mutation = store.toggle_visited_at(&id, now_fn());
            mutation_output("toggled", &store, mutation, &mirror_sync)?
        }
        Commands::Rename { id, name } => {
            let mutation = store.rename_city(&id, &name);
            mutation_output("renamed", &store, mutation, &mirror_sync)?
        }
        Commands::Add {
            name,
            country,
            lat,
            lon,
            emoji,
            importance,
            population,
        } => {
            let mut new_city = NewCity::new(name, country, Coordinates::new(lat, lon))
                .with_importance(importance.into());
            new_city.emoji = emoji;
            new_city.population = population;
            let mutation = store.add_custom_city(new_city);
            mutation_output("added", &store, mutation, &mirror_sync)?
        }
        Commands::Remove { id } => {
            let mutation = store.remove_custom_city(&id);
            mutation_output("removed", &store, mutation, &mirror_sync)?
        }
        Commands::Sync => {
            let Some(mirror_config) = config.mirror.as_ref() else {
                return Err(CliError::user(
                    ERROR_CODE_USER_MIRROR_NOT_CONFIGURED,
                    "mirror is not configured: set TRAVEL_MIRROR_URL, TRAVEL_MIRROR_API_KEY and TRAVEL_USER_ID",
                ));
            };
            let mirror = open_mirror(mirror_config).map_err(|error| {
                CliError::runtime(ERROR_CODE_RUNTIME_MIRROR_INIT, error.to_string())
            })?;
            let outcome = sync_collection(
                mirror.as_ref(),
                &mirror_config.user_id,
                store.cities(),
                now_fn(),
            );
            if let Some(error) = outcome.error {
                return Err(CliError::runtime(ERROR_CODE_RUNTIME_MIRROR_SYNC, error));
            }
            CommandOutput {
                human: format!("synced {} cities", outcome.rows),
                result: json!({ "rows": outcome.rows }),
            }
        }
    };

    render_output(mode, command, output)
}

#[derive(Debug, Serialize)]
struct MutationResult<'a> {
    applied: bool,
    city_id: Option<&'a str>,
    city: Option<&'a travel_core::City>,
    warning: Option<String>,
    sync_error: Option<&'a str>,
}

fn mutation_output<F>(
    action: &str,
    store: &CityStore<FileStorage>,
    mutation: Mutation,
    mirror_sync: &F,
) -> Result<CommandOutput, CliError>
where
    F: Fn(&CityStore<FileStorage>) -> Option<SyncOutcome>,
{
    let sync = if mutation.applied {
        mirror_sync(store)
    } else {
        None
    };

    let city_id = mutation.city_id.as_deref();
    let result = to_value(&MutationResult {
        applied: mutation.applied,
        city_id,
        city: city_id.and_then(|id| store.get(id)),
        warning: mutation.warning.as_ref().map(ToString::to_string),
        sync_error: sync.as_ref().and_then(|outcome| outcome.error.as_deref()),
    })?;

    Ok(CommandOutput {
        human: render::mutation_summary(action, &mutation, sync.as_ref()),
        result,
    })
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, CliError> {
    serde_json::to_value(value).map_err(|error| {
        CliError::runtime(
            ERROR_CODE_RUNTIME_SERIALIZE,
            format!("failed to serialize result: {error}"),
        )
    })
}

#[derive(Debug, Serialize)]
struct ServiceErrorEnvelope {
    code: &'static str,
    message: String,
    details: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ServiceEnvelope {
    schema_version: &'static str,
    command: &'static str,
    ok: bool,
    result: Option<Value>,
    error: Option<ServiceErrorEnvelope>,
}

fn render_output(
    mode: OutputModeArg,
    command: &'static str,
    output: CommandOutput,
) -> Result<String, CliError> {
    match mode {
        OutputModeArg::Human => Ok(output.human),
        OutputModeArg::Json => serde_json::to_string(&ServiceEnvelope {
            schema_version: ENVELOPE_SCHEMA_VERSION,
            command,
            ok: true,
            result: Some(output.result),
            error: None,
        })
        .map_err(|error| {
            CliError::runtime(
                ERROR_CODE_RUNTIME_SERIALIZE,
                format!("failed to serialize service envelope: {error}"),
            )
        }),
    }
}

fn serialize_service_error(command: &'static str, error: &CliError) -> String {
    let envelope = ServiceEnvelope {
        schema_version: ENVELOPE_SCHEMA_VERSION,
        command,
        ok: false,
        result: None,
        error: Some(ServiceErrorEnvelope {
            code: error.code,
            message: error.message.clone(),
            details: Some(json!({
                "kind": error.kind_str(),
                "exit_code": error.exit_code(),
            })),
        }),
    };

    serde_json::to_string(&envelope).unwrap_or_else(|serialize_error| {
        json!({
            "schema_version": ENVELOPE_SCHEMA_VERSION,
            "command": command,
            "ok": false,
            "result": Value::Null,
            "error": {
                "code": "internal.serialize",
                "message": format!("failed to serialize service error envelope: {serialize_error}"),
                "details": Value::Null,
            }
        })
        .to_string()
    })
}
