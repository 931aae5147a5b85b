use anyhow::Context;
use ontopat::api::routes::build_app;
use ontopat::cli::init::{self, InitConfig, InitResult};
use ontopat::cli::output::Output;
use ontopat::cli::{Cli, Commands};
use ontopat::{AppState, OntoConfig};
use std::path::Path;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let result = match cli.command {
        None | Some(Commands::Serve) => serve(&cli.config, cli.verbose),
        Some(Commands::Init {
            path,
            force,
            no_prompts,
            host,
            port,
        }) => {
            let config = InitConfig {
                path,
                force,
                no_prompts,
                host,
                port,
            };
            return match init::run(config, &output) {
                InitResult::Success => ExitCode::SUCCESS,
                InitResult::AlreadyExists | InitResult::Error(_) => ExitCode::FAILURE,
            };
        }
        Some(Commands::Config { full, validate }) => show_config(&cli.config, full, validate, &output),
        Some(Commands::Models) => list_models(&cli.config, &output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &Path) -> anyhow::Result<OntoConfig> {
    OntoConfig::load(path).with_context(|| {
        format!(
            "Failed to load {} (run `ontopat-server init` to create one)",
            path.display()
        )
    })
}

fn init_tracing(config: &OntoConfig, verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{default_level},tower_http=info")))
        .context("Invalid log filter")?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }
    Ok(())
}

fn serve(config_path: &Path, verbose: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    init_tracing(&config, verbose)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    runtime.block_on(async move {
        if !config.prompts.dir.is_dir() {
            tracing::warn!(
                dir = %config.prompts.dir.display(),
                "Prompt directory not found; generate and preview requests will fail"
            );
        }

        let addr = config.bind_address();
        let state = AppState::from_config(config).await;
        let app = build_app(state);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!(address = %addr, "OntoPat server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")
    })
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

fn show_config(path: &Path, full: bool, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config = load_config(path)?;

    if validate {
        // `load` already validated the file itself
        output.success(&format!("{} is valid", path.display()));
        for pattern in ["1_shortcut", "2_subclass"] {
            let dir = config.prompts.dir.join(pattern);
            if dir.is_dir() {
                output.success(&format!("prompt templates found in {}", dir.display()));
            } else {
                output.warning(&format!("missing prompt directory {}", dir.display()));
            }
        }
        return Ok(());
    }

    if full {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    output.header("Configuration");
    output.kv("file", &path.display().to_string());
    output.kv("listen", &config.bind_address());
    output.kv("prompts", &config.prompts.dir.display().to_string());
    output.kv("openai", &config.providers.openai.api_base);
    output.kv("ollama", &config.providers.ollama.base_url);
    output.kv(
        "tgi",
        config
            .providers
            .tgi
            .as_ref()
            .map(|tgi| tgi.base_url.as_str())
            .unwrap_or("disabled"),
    );
    output.kv("models", &config.models.len().to_string());
    output.kv(
        "rendezvous delay",
        &format!("{} ms", config.transient.rendezvous_delay_ms),
    );
    Ok(())
}

fn list_models(path: &Path, output: &Output) -> anyhow::Result<()> {
    let config = load_config(path)?;

    output.header("Models");
    output.table_header(&["Model", "Provider"]);
    for (model, provider) in &config.models {
        output.table_row(&[model.as_str(), provider.as_str()]);
    }
    if let Some(tgi) = &config.providers.tgi {
        for model in &tgi.models {
            output.table_row(&[model.as_str(), "tgi (if reachable)"]);
        }
    }
    Ok(())
}
