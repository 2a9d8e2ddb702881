use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive number of seconds".to_string());
        }
    }
    if let Some(raw) = args.api.as_deref() {
        validate_api_url(raw).map_err(|e| format!("invalid --api '{raw}': {e}"))?;
    }
    if let Some(raw) = args.proxy.as_deref() {
        if raw.trim().is_empty() {
            return Err("invalid --proxy, expected a URL".to_string());
        }
    }
    Ok(())
}

pub fn validate_api_url(raw: &str) -> Result<(), String> {
    let url = reqwest::Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}
