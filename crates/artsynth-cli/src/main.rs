//! `artsynth`: generate the training-image set for one artwork photograph.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use artsynth_core::{load_source, run_variants, Config, RunReport};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "artsynth", version, about)]
struct Args {
    /// JSON config file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing the source photograph
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Directory the variants are written to (created if missing)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// File name of the source photograph inside the input directory
    image: String,
}

/// Config file (or defaults), then environment variables read through `env`,
/// then command-line flags.
fn resolve_config<F>(args: &Args, env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path, env)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::from_lookup(env).context("Invalid configuration")?,
    };

    if let Some(dir) = &args.input_dir {
        config.input_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

fn run<F>(args: &Args, env: F) -> Result<RunReport>
where
    F: Fn(&str) -> Option<String>,
{
    let config = resolve_config(args, env)?;

    let source = load_source(&config, &args.image)
        .with_context(|| format!("Failed to load source image {:?}", args.image))?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let report = run_variants(&source.image, &config.output_dir, &source.file_name)
        .context("Variant run aborted")?;
    Ok(report)
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let report = run(&args, |key| std::env::var(key).ok())?;

    println!(
        "{} of {} variants written",
        report.written.len(),
        report.total()
    );
    for failure in &report.failures {
        eprintln!(
            "  #{} {} failed at {}: {}",
            failure.index, failure.suffix, failure.stage, failure.message
        );
    }

    if report.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_source(dir: &std::path::Path, name: &str) {
        let img = image::RgbImage::from_pixel(40, 30, image::Rgb([20, 120, 200]));
        img.save_with_format(dir.join(name), image::ImageFormat::Jpeg)
            .unwrap();
    }

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "artsynth",
            "--input-dir",
            "in",
            "-o",
            "out",
            "red-tree.jpg",
        ])
        .unwrap();

        assert_eq!(args.input_dir, Some(PathBuf::from("in")));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.config, None);
        assert_eq!(args.image, "red-tree.jpg");

        assert!(Args::try_parse_from(["artsynth"]).is_err());
    }

    #[test]
    fn test_run_writes_full_grid() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_source(input.path(), "red-tree.jpg");
        let out_dir = output.path().join("variants");

        let args = Args {
            config: None,
            input_dir: Some(input.path().to_path_buf()),
            output_dir: Some(out_dir.clone()),
            image: "red-tree.jpg".into(),
        };
        let report = run(&args, no_env).unwrap();

        assert!(report.is_complete());
        assert_eq!(report.written.len(), 37);
        assert!(out_dir.join("red-tree-scale-90.jpg").is_file());
        assert!(out_dir
            .join("red-tree-perspective-type-top-scale-90.jpg")
            .is_file());
    }

    #[test]
    fn test_config_file_with_overrides() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_source(input.path(), "red-tree.jpeg");

        let config_path = input.path().join("artsynth.json");
        std::fs::write(
            &config_path,
            format!(
                r#"{{"input_dir": {:?}, "output_dir": "/nonexistent/ignored"}}"#,
                input.path().display().to_string()
            ),
        )
        .unwrap();

        let args = Args {
            config: Some(config_path),
            input_dir: None,
            output_dir: Some(output.path().to_path_buf()),
            image: "red-tree.jpeg".into(),
        };
        let config = resolve_config(&args, no_env).unwrap();

        assert_eq!(config.input_dir, input.path());
        assert_eq!(config.output_dir, output.path());
    }

    #[test]
    fn test_flags_override_environment() {
        let args = Args::try_parse_from(["artsynth", "--output-dir", "flag-out", "a.jpg"]).unwrap();
        let env = |key: &str| match key {
            artsynth_core::config::ENV_IN_PATH => Some("env-in".to_string()),
            artsynth_core::config::ENV_OUT_PATH => Some("env-out".to_string()),
            _ => None,
        };

        let config = resolve_config(&args, env).unwrap();

        assert_eq!(config.input_dir, PathBuf::from("env-in"));
        assert_eq!(config.output_dir, PathBuf::from("flag-out"));
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let args = Args {
            config: None,
            input_dir: Some(input.path().to_path_buf()),
            output_dir: Some(output.path().to_path_buf()),
            image: "absent.jpg".into(),
        };
        let err = run(&args, no_env).unwrap_err();

        assert!(err.to_string().contains("absent.jpg"));
        assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
    }
}
