//! Init command implementation
//!
//! Scaffolds `ontopat.toml`, `.env.example`, `.gitignore` and a default
//! prompt tree with one template per pattern, provider and technique plus
//! each pattern's output schema.

use super::output::Output;
use crate::llm::ProviderKind;
use crate::prompts::Technique;
use crate::types::PatternKind;
use std::fs;
use std::path::Path;

/// Result of the init operation
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// ontopat.toml already exists and --force was not given
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: std::path::PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Skip writing prompt templates
    pub no_prompts: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

const PATTERNS: [PatternKind; 2] = [PatternKind::Shortcut, PatternKind::Subclass];
const PROVIDERS: [ProviderKind; 3] = [ProviderKind::OpenAI, ProviderKind::Ollama, ProviderKind::Tgi];
const TECHNIQUES: [Technique; 2] = [Technique::Baseline, Technique::FewShot];

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing OntoPat Project");

    let base_path = &config.path;

    let config_path = base_path.join("ontopat.toml");
    if config_path.exists() && !config.force {
        output.warning("ontopat.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    if let Err(e) = fs::create_dir_all(base_path) {
        output.error(&format!("Failed to create {}: {}", base_path.display(), e));
        return InitResult::Error(e.to_string());
    }

    output.subheader("Creating configuration files");

    let files = [
        ("config", "ontopat.toml", generate_ontopat_toml(&config)),
        ("env", ".env.example", generate_env_example()),
    ];
    for (kind, name, content) in &files {
        if let Err(e) = write_file(&base_path.join(name), content, config.force) {
            output.error(&format!("Failed to create {}: {}", name, e));
            return InitResult::Error(e.to_string());
        }
        output.created(kind, name);
    }

    let gitignore_path = base_path.join(".gitignore");
    if gitignore_path.exists() {
        output.skipped(".gitignore", "already exists");
    } else if let Err(e) = write_file(&gitignore_path, &generate_gitignore(), false) {
        output.warning(&format!("Failed to create .gitignore: {}", e));
    } else {
        output.created("file", ".gitignore");
    }

    if !config.no_prompts {
        output.subheader("Creating prompt templates");
        if let Err(e) = create_prompt_tree(base_path, config.force, output) {
            output.error(&format!("Failed to create prompt templates: {}", e));
            return InitResult::Error(e.to_string());
        }
    }

    output.complete("OntoPat project initialized successfully!");

    output.header("Next Steps");
    output.newline();
    output.info("1. Set up environment variables:");
    output.command("cp .env.example .env");
    output.command("# Edit .env and set OPENAI_API_KEY");
    output.newline();
    output.info("2. Start the server:");
    output.command("ontopat-server");
    output.newline();

    output.hint(&format!(
        "Server will be available at http://{}:{}",
        config.host, config.port
    ));
    output.hint("OpenAPI document at /api/openapi.json, Swagger UI with --features swagger-ui");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

fn create_prompt_tree(base_path: &Path, force: bool, output: &Output) -> std::io::Result<()> {
    for pattern in PATTERNS {
        let dir = pattern.default_template_dir();

        let schema_rel = format!("prompts/{}/output_schema.json", dir);
        write_or_skip(base_path, &schema_rel, &generate_output_schema(pattern), force, output)?;

        for provider in PROVIDERS {
            for technique in TECHNIQUES {
                let rel = format!("prompts/{}/{}/{}.txt", dir, provider.as_str(), technique.as_str());
                let content = generate_template(pattern, provider, technique);
                write_or_skip(base_path, &rel, &content, force, output)?;
            }
        }
    }
    Ok(())
}

fn write_or_skip(
    base_path: &Path,
    rel: &str,
    content: &str,
    force: bool,
    output: &Output,
) -> std::io::Result<()> {
    let path = base_path.join(rel);
    if path.exists() && !force {
        output.skipped(rel, "already exists");
        return Ok(());
    }
    write_file(&path, content, force)?;
    output.created("prompt", rel);
    Ok(())
}

fn generate_ontopat_toml(config: &InitConfig) -> String {
    format!(
        r#"# OntoPat Configuration
# =====================
# Generated by: ontopat-server init
#
# Secrets are read from the environment (see .env.example).
# HOST, PORT and ALLOWED_ORIGINS in the environment override [server].

[server]
host = "{host}"
port = {port}
log_level = "info"
# pretty or json
log_format = "pretty"
# Empty list allows any origin
cors_origins = []

[prompts]
# Layout: {{dir}}/{{pattern}}/{{provider}}/{{baseline|few_shot}}.txt
dir = "./prompts"

[providers.openai]
api_key_env = "OPENAI_API_KEY"
api_base = "https://api.openai.com/v1"
# Models that only accept temperature 1.0
reasoning_models = ["o1-preview", "o1-mini"]

[providers.ollama]
base_url = "http://localhost:11434"
num_ctx = 4096

# Text Generation Inference is optional. Its models are only routable when
# GET {{base_url}}/info answers at startup.
# [providers.tgi]
# base_url = "http://localhost:8080"
# max_tokens = 2000
# models = ["llama-3.1-8b-instruct(fp16)"]

[models]
"gpt-4.1-2025-04-14" = "openai"
"gpt-4o" = "openai"
"o3-mini-2025-01-31" = "openai"
"o4-mini-2025-04-16" = "openai"
"gpt-3.5-turbo" = "openai"
"deepseek-r1-distill-llama-70b:q4" = "ollama"
"llama-3.3-70b-instruct:q4" = "ollama"

[transient]
# Delay before GET /api/_temp_localstorage_data answers
rendezvous_delay_ms = 2000
capacity = 1024
ttl_secs = 600
"#,
        host = config.host,
        port = config.port
    )
}

fn generate_env_example() -> String {
    r#"# OntoPat environment
# Copy to .env and fill in.

OPENAI_API_KEY=

# Optional overrides for [server]
# HOST=0.0.0.0
# PORT=8000
# ALLOWED_ORIGINS=http://localhost:3000,https://ontopat.example.org

# Log filter, takes precedence over server.log_level
# RUST_LOG=ontopat=debug,tower_http=info
"#
    .to_string()
}

fn generate_gitignore() -> String {
    r#"# Environment
.env

# Build output
/target
"#
    .to_string()
}

fn generate_output_schema(pattern: PatternKind) -> String {
    let name_field = match pattern {
        PatternKind::Shortcut => "property_name",
        PatternKind::Subclass => "class_name",
    };
    let schema = serde_json::json!({
        "type": "object",
        "properties": {
            name_field: { "type": "string" },
            "explanation": { "type": "string" }
        },
        "required": [name_field, "explanation"]
    });
    // Pretty printing a Value cannot fail
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| schema.to_string()) + "\n"
}

fn task_section(pattern: PatternKind) -> &'static str {
    match pattern {
        PatternKind::Shortcut => {
            "You are an ontology engineer. Consider this chain of classes and properties:\n\
             - Class A: $A_label\n  - Property p: $p_label\n\
             - Class B: $B_label\n  - Property r: $r_label\n\
             - Class C: $C_label\n\n\
             A shortcut property links A directly to C and stands for the path\n\
             A -p-> B -r-> C. Suggest a concise lowerCamelCase name for this\n\
             shortcut property and explain the choice in one or two sentences.\n"
        }
        PatternKind::Subclass => {
            "You are an ontology engineer. Consider this fragment of an ontology:\n\
             - Class A: $A_label:\n  - Property p ($p_label):\n    - Domain: $A_label\n    - Range: $B_label\n\
             - Class B: $B_label\n\
             - Class C: $C_label, a subclass of $B_label\n\n\
             Suggest a concise UpperCamelCase name for the subclass of A whose\n\
             instances are related through p to instances of C, and explain the\n\
             choice in one or two sentences.\n"
        }
    }
}

fn answer_section(pattern: PatternKind, provider: ProviderKind) -> &'static str {
    match (pattern, provider) {
        (PatternKind::Shortcut, ProviderKind::OpenAI) => {
            "Answer with a single JSON object and nothing else:\n\
             {\"property_name\": \"...\", \"explanation\": \"...\"}\n"
        }
        (PatternKind::Subclass, ProviderKind::OpenAI) => {
            "Answer with a single JSON object and nothing else:\n\
             {\"class_name\": \"...\", \"explanation\": \"...\"}\n"
        }
        _ => "Answer with JSON matching this schema:\n$output_schema\n",
    }
}

fn generate_template(pattern: PatternKind, provider: ProviderKind, technique: Technique) -> String {
    let mut text = String::new();
    if technique == Technique::FewShot {
        text.push_str("Here are some solved examples:\n\n$few_shot_examples\n\nNow solve the following task.\n\n");
    }
    text.push_str(task_section(pattern));
    text.push('\n');
    text.push_str(answer_section(pattern, provider));
    text
}
