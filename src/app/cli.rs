use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub asset_path: PathBuf,
    pub strict: bool,
}

pub fn parse_from_env() -> Result<AppConfig, String> {
    parse_args(std::env::args())
}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<AppConfig, String> {
    let mut args = args.into_iter();
    let program = args.next().unwrap_or_else(|| "cobalt_assets".to_string());
    let usage = format!(
        "Usage: {} [--strict] <path_to_asset>\nExample: cargo run -- --strict resources/models/teapot.obj",
        program
    );

    let mut strict = false;
    let mut asset_path: Option<String> = None;
    for arg in args {
        match arg.as_str() {
            "--strict" => strict = true,
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option '{}'\n{}", flag, usage));
            }
            _ if asset_path.is_some() => return Err(usage),
            _ => asset_path = Some(arg),
        }
    }

    let asset_path = asset_path.ok_or(usage)?;
    validate_path(&asset_path)?;

    Ok(AppConfig {
        asset_path: PathBuf::from(asset_path),
        strict,
    })
}

fn validate_path(path: &str) -> Result<(), String> {
    let file_path = Path::new(path);
    if !file_path.exists() {
        return Err(format!("asset file does not exist: {}", path));
    }
    if !file_path.is_file() {
        return Err(format!("asset path is not a file: {}", path));
    }
    Ok(())
}
