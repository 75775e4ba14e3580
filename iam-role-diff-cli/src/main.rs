use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use iam_role_diff_core::{
    combine, compare, to_indented_json, DiffConfig, DiffRenderer, GreedyAligner, LineDiffRenderer,
    Policy,
};
use iam_role_diff_sources::{IamRoleSource, PolicySource};

const ORIGINAL_POLICY_FILE: &str = "original.json";
const NEW_POLICY_FILE: &str = "new.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// OLD and NEW are IAM role names
    Iam,
    /// OLD and NEW are glob patterns of local policy files
    Local,
}

#[derive(Parser, Debug)]
#[command(
    name = "iam-role-diff",
    version,
    about = "Compare the combined IAM policies of two roles statement by statement",
    after_help = "Statements are paired when they target the same service and their edit distance is \
                  below --max-distance (or $IAM_ROLE_DIFF_MAX_DISTANCE, default 100)."
)]
struct Cli {
    /// Old side: role name, or glob pattern with --source local
    old: String,

    /// New side: role name, or glob pattern with --source local
    new: String,

    /// Where to read policy documents from
    #[arg(long, value_enum, default_value_t = SourceKind::Iam)]
    source: SourceKind,

    /// AWS region for IAM calls (defaults to the SDK's region chain)
    #[arg(long)]
    region: Option<String>,

    /// Directory the two combined policies are written to
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Edit-distance ceiling for pairing two statements
    #[arg(long)]
    max_distance: Option<usize>,

    /// Disable coloured diff output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match cli.max_distance {
        Some(max_distance) => DiffConfig::default().with_max_distance(max_distance),
        None => DiffConfig::from_env(),
    };

    let source = match cli.source {
        SourceKind::Iam => PolicySource::Iam(IamRoleSource::from_env(cli.region.clone()).await),
        SourceKind::Local => PolicySource::Local,
    };

    println!("Comparing {} and {}", cli.old, cli.new);

    let old_docs = source
        .fetch(&cli.old)
        .await
        .with_context(|| format!("Failed to fetch policies for '{}'", cli.old))?;
    let new_docs = source
        .fetch(&cli.new)
        .await
        .with_context(|| format!("Failed to fetch policies for '{}'", cli.new))?;

    info!("Building a combined and sorted policy doc for {}", cli.old);
    let old_policy = combine(&old_docs);
    info!("Building a combined and sorted policy doc for {}", cli.new);
    let new_policy = combine(&new_docs);

    let color = !cli.no_color && std::io::stdout().is_terminal();
    if !color {
        colored::control::set_override(false);
    }

    let renderer = LineDiffRenderer::new(color);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_identifier_diff(&mut out, &renderer, &cli.old, &cli.new)
        .context("Failed to write output")?;
    compare(
        &old_policy,
        &new_policy,
        &GreedyAligner::from_config(&config),
        &renderer,
        &mut out,
    )
    .context("Failed to compare policies")?;
    out.flush().context("Failed to flush output")?;

    write_policies(&cli.out_dir, &old_policy, &new_policy)
}

/// Blank-line framed diff of the two identifiers; nothing between the blanks when they are equal
fn write_identifier_diff(
    out: &mut dyn Write,
    renderer: &dyn DiffRenderer,
    old: &str,
    new: &str,
) -> std::io::Result<()> {
    writeln!(out)?;
    renderer.render(old.as_bytes(), new.as_bytes(), out)?;
    writeln!(out)
}

/// Save both combined policies for manual inspection
fn write_policies(out_dir: &Path, old: &Policy, new: &Policy) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    for (file_name, policy) in [(ORIGINAL_POLICY_FILE, old), (NEW_POLICY_FILE, new)] {
        let path = out_dir.join(file_name);
        let text = to_indented_json(policy).context("Failed to serialize combined policy")?;
        std::fs::write(&path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote combined policy to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["iam-role-diff", "old-role", "new-role"])
            .expect("should parse");
        assert_eq!(cli.source, SourceKind::Iam);
        assert_eq!(cli.out_dir, PathBuf::from("out"));
        assert_eq!(cli.max_distance, None);
        assert!(!cli.no_color);
    }

    #[test]
    fn test_local_source_with_overrides() {
        let cli = Cli::try_parse_from([
            "iam-role-diff",
            "--source",
            "local",
            "--max-distance",
            "40",
            "-vv",
            "cdk/*.json",
            "terraform/*.json",
        ])
        .expect("should parse");
        assert_eq!(cli.source, SourceKind::Local);
        assert_eq!(cli.max_distance, Some(40));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.old, "cdk/*.json");
    }

    #[test]
    fn test_missing_arguments() {
        assert!(Cli::try_parse_from(["iam-role-diff", "only-one"]).is_err());
    }

    #[test]
    fn test_identifier_diff() {
        let mut out = Vec::new();
        write_identifier_diff(&mut out, &LineDiffRenderer::plain(), "app-role-v1", "app-role-v2")
            .expect("should write");
        assert_eq!(
            String::from_utf8(out).expect("utf-8"),
            "\n- app-role-v1\n+ app-role-v2\n\n"
        );

        let mut out = Vec::new();
        write_identifier_diff(&mut out, &LineDiffRenderer::plain(), "app-role", "app-role")
            .expect("should write");
        assert_eq!(String::from_utf8(out).expect("utf-8"), "\n\n");
    }

    #[test]
    fn test_write_policies() {
        let dir = tempfile::TempDir::new().expect("should create temp dir");
        let out_dir = dir.path().join("nested").join("out");
        let old = combine([
            r#"{"Statement": {"Effect": "Allow", "Action": "s3:GetObject", "Resource": "arn:aws:s3:::b/*"}}"#,
        ]);
        let new = combine(Vec::<String>::new());

        write_policies(&out_dir, &old, &new).expect("should write");

        let original = std::fs::read_to_string(out_dir.join(ORIGINAL_POLICY_FILE))
            .expect("should read original");
        assert!(original.contains("\"Id\": \"combined\""));
        assert!(original.contains("s3:GetObject"));
        let new_text =
            std::fs::read_to_string(out_dir.join(NEW_POLICY_FILE)).expect("should read new");
        assert!(new_text.contains("\"Statement\": []"));
    }
}
