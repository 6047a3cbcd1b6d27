use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use fit_core::{FitConfig, DEFAULT_MAX_ATTEMPTS};
use tracing_subscriber::EnvFilter;

mod fallback;
mod remote;

use fallback::{run_local, run_with_fallback, FitOutcome, Job, Route};
use remote::RemoteClient;

/// 画像を書類用の仕様（寸法・KB 範囲・形式）に合わせる
///
/// 既定ではサーバーで処理し、サーバーに到達できない場合はローカルで処理する。
#[derive(Parser, Debug)]
#[command(name = "photo-fit")]
#[command(about = "Resize and re-encode an image to fit a size window")]
struct Args {
    /// Input image (JPEG or PNG)
    input: PathBuf,

    /// Preset name: photo, signature, thumb, declaration
    #[arg(short, long)]
    preset: Option<String>,

    /// Free-text rule, e.g. "200x230, 20-50kb, jpg"
    #[arg(short, long)]
    rule: Option<String>,

    /// Output path (default: <input>_fitted.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// fit-server base URL
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Process locally without contacting the server
    #[arg(long)]
    local: bool,

    /// Maximum quality-search attempts (at least 15)
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let data = std::fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let job = Job {
        data,
        preset: args.preset.as_deref(),
        rule: args.rule.as_deref(),
        config: FitConfig::new(args.max_attempts),
    };

    let outcome = if args.local {
        run_local(job)?
    } else {
        let client = RemoteClient::new(&args.server)?;
        run_with_fallback(Some(&client), job)?
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input, &outcome.report.format));
    write_output(&output, &outcome)?;

    println!("{}", summary(&outcome, &output));
    Ok(())
}

/// 入力ファイル名に "_fitted" を付けた出力先
fn default_output_path(input: &Path, format: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}_fitted.{}", format.to_lowercase()))
}

fn write_output(path: &Path, outcome: &FitOutcome) -> Result<()> {
    std::fs::write(path, &outcome.bytes)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn summary(outcome: &FitOutcome, output: &Path) -> String {
    let report = &outcome.report;
    let route = match outcome.route {
        Route::Server => "server",
        Route::Local => "local",
    };
    let status = if report.valid { "OK" } else { "OUT OF RANGE" };

    format!(
        "{} {}x{} {:.2} KB [{status}] ({route}) -> {}",
        report.format,
        report.width,
        report.height,
        report.size_kb,
        output.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fit_core::ValidationReport;

    fn outcome(valid: bool) -> FitOutcome {
        FitOutcome {
            bytes: vec![1, 2, 3],
            report: ValidationReport {
                width: 140,
                height: 60,
                size_kb: 12.3456,
                format: "JPG".to_string(),
                valid,
            },
            route: Route::Local,
        }
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/tmp/me.png"), "JPG"),
            PathBuf::from("/tmp/me_fitted.jpg")
        );
        assert_eq!(
            default_output_path(Path::new("scan"), "PNG"),
            PathBuf::from("scan_fitted.png")
        );
    }

    #[test]
    fn test_summary() {
        let text = summary(&outcome(true), Path::new("out.jpg"));
        assert_eq!(text, "JPG 140x60 12.35 KB [OK] (local) -> out.jpg");

        let text = summary(&outcome(false), Path::new("out.jpg"));
        assert!(text.contains("[OUT OF RANGE]"));
    }

    #[test]
    fn test_write_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        write_output(&path, &outcome(true)).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "photo-fit",
            "me.png",
            "--preset",
            "signature",
            "--local",
        ])
        .unwrap();
        assert_eq!(args.preset.as_deref(), Some("signature"));
        assert!(args.local);
        assert_eq!(args.max_attempts, 20);
        assert_eq!(args.server, "http://127.0.0.1:8080");
    }
}
