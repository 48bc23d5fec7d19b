//! Command-line front ends for the services, clients and key generator.
//!
//! Exit codes: `0` on success, `2` when a client cannot connect, `1` for every other
//! failure including bad arguments.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use crate::config::NetworkConfig;
use crate::error::{ProtocolError, Result};
use crate::protocol::dispatcher::Server;
use crate::protocol::handshake::Role;
use crate::service::client;
use crate::utils::{input, keygen, logging};

/// Arguments of `enc_server` / `dec_server`
#[derive(Parser, Debug)]
#[command(version)]
pub struct ServerArgs {
    /// Port to listen on
    pub port: u16,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments of `enc_client` / `dec_client`
#[derive(Parser, Debug)]
#[command(version)]
pub struct ClientArgs {
    /// File holding the plaintext (enc_client) or ciphertext (dec_client)
    pub input: PathBuf,

    /// File holding the key
    pub key: PathBuf,

    /// Port the service listens on
    pub port: u16,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments of `keygen`
#[derive(Parser, Debug)]
#[command(version)]
pub struct KeygenArgs {
    /// Number of key symbols to generate
    #[arg(allow_hyphen_values = true)]
    pub length: String,
}

/// Parse `T` from the process arguments, mapping usage errors to exit code 1.
fn parse_args<T: Parser>() -> std::result::Result<T, ExitCode> {
    T::try_parse().map_err(|e| {
        let _ = e.print();
        if e.use_stderr() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    })
}

fn load_config(path: Option<&Path>) -> Result<NetworkConfig> {
    let mut config = match path {
        Some(path) => NetworkConfig::from_file(path)?,
        None => NetworkConfig::default(),
    };
    config.apply_env()?;
    config.validate_strict()?;
    Ok(config)
}

fn setup(config: Option<&Path>, app_name: &str) -> std::result::Result<NetworkConfig, ExitCode> {
    let mut config = load_config(config).map_err(|e| {
        eprintln!("{app_name}: ERROR {e}");
        ExitCode::FAILURE
    })?;
    config.logging.app_name = app_name.to_string();
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("{app_name}: ERROR {e}");
    }
    Ok(config)
}

fn exit_code(e: &ProtocolError) -> ExitCode {
    ExitCode::from(e.exit_code())
}

/// Entry point of the encryption and decryption services.
pub async fn run_server(role: Role) -> ExitCode {
    let args: ServerArgs = match parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };
    let app_name = format!("{}_server", &role.as_str()[..3]);
    let config = match setup(args.config.as_deref(), &app_name) {
        Ok(config) => config,
        Err(code) => return code,
    };

    match serve(role, args.port, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Service terminated");
            exit_code(&e)
        }
    }
}

async fn serve(role: Role, port: u16, config: &NetworkConfig) -> Result<()> {
    let server_config = config.server.clone().with_port(port)?;
    let server = Server::bind(role, &server_config)?;
    info!(role = %role, address = %server.local_addr()?, "Service started");
    server.run().await
}

/// Entry point of the encryption and decryption clients.
///
/// Prints the service's result followed by a newline on stdout.
pub async fn run_client(role: Role) -> ExitCode {
    let args: ClientArgs = match parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };
    let app_name = format!("{}_client", &role.as_str()[..3]);
    let config = match setup(args.config.as_deref(), &app_name) {
        Ok(config) => config,
        Err(code) => return code,
    };

    match exchange(role, &args, &config).await {
        Ok(result) => {
            println!("{}", String::from_utf8_lossy(&result));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, port = args.port, "Request failed");
            exit_code(&e)
        }
    }
}

async fn exchange(role: Role, args: &ClientArgs, config: &NetworkConfig) -> Result<Vec<u8>> {
    let payload = input::read_pad_file(&args.input).await?;
    let key = input::read_pad_file(&args.key).await?;
    client::request_with_config(&config.client, args.port, role, &payload, &key).await
}

/// Entry point of the key generator: prints `length` random symbols and a newline.
///
/// A length that is not an integer in `1..=MAX_KEY_LENGTH` exits with `2`, a key that
/// cannot be allocated with `3`.
pub fn run_keygen() -> ExitCode {
    let args: KeygenArgs = match parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };

    let key = args
        .length
        .parse::<usize>()
        .map_err(|_| {
            ProtocolError::InvalidInput("Key length must be a valid integer".to_string())
        })
        .and_then(|length| keygen::generate_key(length, &mut rand::rng()));

    match key {
        Ok(key) => {
            println!("{}", String::from_utf8_lossy(&key));
            ExitCode::SUCCESS
        }
        Err(e @ ProtocolError::AllocationFailure(_)) => {
            eprintln!("ERROR: {e}");
            ExitCode::from(3)
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::from(2)
        }
    }
}
