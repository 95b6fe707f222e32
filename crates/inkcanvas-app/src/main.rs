//! Replays a gesture script and writes the result as PNG.
//!
//! Usage: `inkcanvas [--config PATH] SCRIPT.json OUTPUT.png`

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting InkCanvas");

    if let Err(err) = run(std::env::args().skip(1).collect()) {
        log::error!("{err}");
        eprintln!("inkcanvas: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}

#[cfg(feature = "native")]
const USAGE: &str = "Usage: inkcanvas [--config PATH] SCRIPT.json OUTPUT.png";

#[cfg(feature = "native")]
fn run(args: Vec<String>) -> Result<(), inkcanvas_app::ReplayError> {
    use inkcanvas_app::{AppConfig, Replay, ReplayError, load_script, write_png};
    use std::path::PathBuf;

    let mut config_path: Option<PathBuf> = None;
    let mut positional = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| ReplayError::Usage("--config needs a path".to_string()))?;
                config_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let [script, output] = <[PathBuf; 2]>::try_from(positional)
        .map_err(|_| ReplayError::Usage(USAGE.to_string()))?;

    let config = match config_path {
        Some(path) => AppConfig::load(&path)?,
        None => AppConfig::default(),
    };
    let steps = load_script(&script)?;
    let mut replay = Replay::new(config)?;
    replay.run(&steps)?;
    write_png(replay.session(), &output)?;
    log::info!("Wrote {}", output.display());
    Ok(())
}

#[cfg(all(test, feature = "native"))]
mod tests {
    use super::*;
    use inkcanvas_app::ReplayError;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_usage_errors_are_typed() {
        assert!(matches!(run(args(&["only-one.json"])), Err(ReplayError::Usage(_))));
        assert!(matches!(run(args(&["--config"])), Err(ReplayError::Usage(_))));
        assert!(run(args(&["--help"])).is_ok());
    }

    #[test]
    fn test_run_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script.json");
        let output = dir.path().join("out.png");
        std::fs::write(&script, r#"[{"step": "down", "x": 4, "y": 4}, {"step": "up"}]"#).unwrap();
        let result = run(vec![
            script.display().to_string(),
            output.display().to_string(),
        ]);
        assert!(result.is_ok());
        assert!(output.exists());
        assert!(matches!(
            run(vec![dir.path().join("missing.json").display().to_string(), output.display().to_string()]),
            Err(ReplayError::Io(_))
        ));
    }
}
