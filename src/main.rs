use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;

use adminkit::api::{auth, ApiClient, KeychainTokenSource, RequestOverrides, DEFAULT_BASE_URL};
use adminkit::gate::{AdminGate, AdminSession, GateOutcome};
use adminkit::toast::{ToastKind, ToastQueue};

#[derive(Parser, Debug)]
#[command(name = "adminkit", about = "Admin console client")]
struct Args {
    /// Backend origin (overrides ADMINKIT_API_URL / BACKEND_BASE_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in against the backend and store the id token in the Keychain
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Remove the stored id token
    Logout,
    /// Send one request to the backend and print the result
    Request {
        /// Origin-relative path, e.g. /products
        path: String,
        /// JSON body; switches the default method to POST
        #[arg(long)]
        data: Option<String>,
        /// Explicit HTTP method
        #[arg(long)]
        method: Option<String>,
        /// Extra header as NAME:VALUE (repeatable)
        #[arg(long = "header")]
        headers: Vec<String>,
    },
    /// Check admin credentials against the configured gate
    Gate {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    env_logger::init();

    let args = Args::parse();

    // API base URL: --api-url > ADMINKIT_API_URL > BACKEND_BASE_URL > localhost default
    let api_base_url = args
        .api_url
        .clone()
        .or_else(|| std::env::var("ADMINKIT_API_URL").ok())
        .or_else(|| std::env::var("BACKEND_BASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let service = std::env::var("ADMINKIT_KEYCHAIN_SERVICE")
        .unwrap_or_else(|_| auth::DEFAULT_SERVICE_NAME.to_string());

    let toasts = ToastQueue::new();
    let printed = Arc::new(std::sync::Mutex::new(std::collections::HashSet::new()));
    toasts.subscribe(move |visible| {
        let Ok(mut printed) = printed.lock() else {
            return;
        };
        for toast in visible {
            if printed.insert(toast.id.clone()) {
                match toast.kind {
                    ToastKind::Error => eprintln!("[{}] {}", toast.kind, toast.message),
                    _ => println!("[{}] {}", toast.kind, toast.message),
                }
            }
        }
    });

    let ok = match args.command {
        Command::Login { email, password } => {
            let api = ApiClient::new(&api_base_url, Arc::new(KeychainTokenSource::new(&service)));
            match api.login(&email, &password).await {
                Ok(tokens) => match auth::store_token(&service, &tokens.id_token) {
                    Ok(()) => {
                        toasts.success(format!("Logged in as {}", email));
                        true
                    }
                    Err(e) => {
                        toasts.error(format!("Keychain store failed: {}", e));
                        false
                    }
                },
                Err(e) => {
                    toasts.error(e.message());
                    false
                }
            }
        }
        Command::Logout => match auth::delete_token(&service) {
            Ok(()) => {
                toasts.info("Logged out");
                true
            }
            Err(e) => {
                toasts.error(format!("Keychain delete failed: {}", e));
                false
            }
        },
        Command::Request {
            path,
            data,
            method,
            headers,
        } => {
            let api = ApiClient::new(&api_base_url, Arc::new(KeychainTokenSource::new(&service)));
            match run_request(&api, &path, data, method, headers).await {
                Ok(output) => {
                    println!("{}", output);
                    true
                }
                Err(message) => {
                    toasts.error(message);
                    false
                }
            }
        }
        Command::Gate { username, password } => {
            let admin_user =
                std::env::var("ADMINKIT_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
            let admin_password = std::env::var("ADMINKIT_ADMIN_PASSWORD").ok();
            let gate = AdminGate::new(&admin_user, admin_password.as_deref());
            let mut session = AdminSession::default();
            match gate.attempt(&mut session, &username, &password) {
                GateOutcome::Redirect { location } => {
                    toasts.success(format!("Access granted, redirecting to {}", location));
                    true
                }
                GateOutcome::Rejected { error } => {
                    toasts.error(error);
                    false
                }
            }
        }
    };

    // Let pending toasts expire so the queue drains before exit.
    while !toasts.is_empty() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Parse the CLI inputs into a request and return the printable result.
async fn run_request(
    api: &ApiClient,
    path: &str,
    data: Option<String>,
    method: Option<String>,
    headers: Vec<String>,
) -> Result<String, String> {
    let mut overrides = RequestOverrides::default();

    if let Some(method) = method {
        let method = Method::from_bytes(method.to_uppercase().as_bytes())
            .map_err(|_| format!("Invalid HTTP method: {}", method))?;
        overrides = overrides.method(method);
    }

    for header in headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| format!("Invalid header (expected NAME:VALUE): {}", header))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|e| format!("Invalid header name {}: {}", name, e))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|e| format!("Invalid header value for {}: {}", name, e))?;
        overrides = overrides.header(name, value);
    }

    let body: Option<serde_json::Value> = data
        .map(|raw| serde_json::from_str(&raw).map_err(|e| format!("Invalid JSON body: {}", e)))
        .transpose()?;

    log::info!("Requesting {}{}", api.base_url(), path);
    let resp = api
        .request(path, body.as_ref(), overrides)
        .await
        .map_err(|e| e.message())?;
    Ok(resp.to_string())
}
