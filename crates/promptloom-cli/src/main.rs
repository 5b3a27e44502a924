#![deny(unsafe_code)]

//! PromptLoom CLI — render, validate, and inspect prompt templates.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use promptloom_engine::{
    Context, TemplateEngine, ThinkingStyle, ThinkingTemplate, extract_variables,
    validate_template,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// PromptLoom — a prompt templating toolkit for conversational AI.
#[derive(Parser)]
#[command(name = "promptloom", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template file against a context.
    Render {
        /// Template file to render.
        template: PathBuf,

        /// JSON file with variable bindings (a flat or nested object).
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Inline bindings, overriding the context file.
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,

        /// Prepend a thinking-mode instruction prefix of this style.
        #[arg(long)]
        thinking: Option<ThinkingStyle>,
    },

    /// Check a template for structural defects.
    Validate {
        /// Template file to check.
        template: PathBuf,
    },

    /// List the variables a template references.
    Vars {
        /// Template file to inspect.
        template: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing subscriber with verbosity level
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Render {
            template,
            context,
            vars,
            thinking,
        } => {
            let output = render_output(&template, context.as_deref(), &vars, thinking)?;
            println!("{output}");
        }
        Commands::Validate { template } => cmd_validate(&template)?,
        Commands::Vars { template } => {
            for name in template_vars(&template)? {
                println!("{name}");
            }
        }
    }

    Ok(())
}

fn render_output(
    template_path: &Path,
    context_path: Option<&Path>,
    vars: &[String],
    thinking: Option<ThinkingStyle>,
) -> Result<String> {
    let template = read_template(template_path)?;
    let mut ctx = match context_path {
        Some(path) => load_context(path)?,
        None => Context::new(),
    };
    for binding in vars {
        let (key, value) = parse_var(binding)?;
        ctx.set_variable(key, value);
    }

    let engine = TemplateEngine::new();
    let output = match thinking {
        Some(style) => {
            engine.render_thinking_prompt(&ThinkingTemplate::new(style), &template, &ctx)
        }
        None => engine.render(&template, &ctx),
    };
    Ok(output)
}

fn cmd_validate(template_path: &Path) -> Result<()> {
    let template = read_template(template_path)?;
    let diagnostics = validate_template(&template);
    if diagnostics.is_empty() {
        println!("Template '{}' is well-formed.", template_path.display());
        return Ok(());
    }
    for diagnostic in &diagnostics {
        eprintln!("{diagnostic}");
    }
    bail!(
        "template '{}' has {} structural defect(s)",
        template_path.display(),
        diagnostics.len()
    );
}

fn template_vars(template_path: &Path) -> Result<Vec<String>> {
    let template = read_template(template_path)?;
    Ok(extract_variables(&template).into_iter().collect())
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read template file '{}'", path.display()))
}

fn load_context(path: &Path) -> Result<Context> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read context file '{}'", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("context file '{}' is not valid JSON", path.display()))?;
    if !json.is_object() {
        bail!("context file '{}' must contain a JSON object", path.display());
    }
    info!(path = %path.display(), "loaded context file");
    Ok(Context::from_json(json))
}

/// Split a `key=value` binding. The value is bound as a string.
fn parse_var(binding: &str) -> Result<(String, String)> {
    match binding.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => bail!("invalid --var '{binding}': expected KEY=VALUE"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{contents}").unwrap();
        path
    }

    #[test]
    fn test_parse_var() {
        assert_eq!(
            parse_var("name=Alice").unwrap(),
            ("name".to_string(), "Alice".to_string())
        );
        // Values may contain '='.
        assert_eq!(
            parse_var("query=a=b").unwrap(),
            ("query".to_string(), "a=b".to_string())
        );
        assert!(parse_var("no-equals").is_err());
        assert!(parse_var("=value").is_err());
    }

    #[test]
    fn test_render_with_context_file_and_overrides() {
        let dir = TempDir::new().unwrap();
        let template = write_file(&dir, "greet.txt", "Hello {name}, role {user.role}.");
        let context = write_file(
            &dir,
            "ctx.json",
            r#"{"name": "file", "user": {"role": "admin"}}"#,
        );

        let out = render_output(
            &template,
            Some(context.as_path()),
            &["name=override".to_string()],
            None,
        )
        .unwrap();
        assert_eq!(out, "Hello override, role admin.");
    }

    #[test]
    fn test_render_without_context_preserves_placeholders() {
        let dir = TempDir::new().unwrap();
        let template = write_file(&dir, "greet.txt", "Hello {name}!");
        let out = render_output(&template, None, &[], None).unwrap();
        assert_eq!(out, "Hello {name}!");
    }

    #[test]
    fn test_render_with_thinking_prefix() {
        let dir = TempDir::new().unwrap();
        let template = write_file(&dir, "greet.txt", "Hello {name}!");
        let out = render_output(
            &template,
            None,
            &["name=Alice".to_string()],
            Some(ThinkingStyle::StepByStep),
        )
        .unwrap();
        assert!(out.contains("step by step"));
        assert!(out.ends_with("Hello Alice!"));
    }

    #[test]
    fn test_validate_rejects_defective_template() {
        let dir = TempDir::new().unwrap();
        let template = write_file(&dir, "bad.txt", "Hello {name! Missing closing brace");
        assert!(cmd_validate(&template).is_err());

        let good = write_file(&dir, "good.txt", "Hello {name}!");
        assert!(cmd_validate(&good).is_ok());
    }

    #[test]
    fn test_vars_listing() {
        let dir = TempDir::new().unwrap();
        let template = write_file(&dir, "t.txt", "{b} {a.x} {if c}{endif}");
        assert_eq!(template_vars(&template).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_rejects_non_object_context() {
        let dir = TempDir::new().unwrap();
        let template = write_file(&dir, "t.txt", "{a}");
        let context = write_file(&dir, "ctx.json", r#"["not", "an", "object"]"#);
        assert!(render_output(&template, Some(context.as_path()), &[], None).is_err());
    }
}
