use std::{
    collections::HashMap,
    env, fs,
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    dao::SubscriptionRegistry,
    error::Error,
    helpers::parse_list,
    push::{PushTransport, WebPush},
    types::Urgency,
    vapid::VapidKeys,
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

pub struct State {
    pub config: Config,
    pub registry: SubscriptionRegistry,
    pub transport: Box<dyn PushTransport>,
    pub vapid_public_key: String,
}

impl State {
    pub fn new(config: Config) -> Result<State, Error> {
        let vapid =
            Arc::new(VapidKeys::load_or_generate(&config.vapid_private_key)?);
        let vapid_public_key = vapid.public_key().to_owned();
        let transport = WebPush::new(&config, vapid)?;

        Ok(Self::with_transport(
            config,
            vapid_public_key,
            Box::new(transport),
        ))
    }

    pub fn with_transport(
        config: Config,
        vapid_public_key: String,
        transport: Box<dyn PushTransport>,
    ) -> State {
        State {
            config,
            registry: SubscriptionRegistry::new(),
            transport,
            vapid_public_key,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: Option<String>,
    pub timeout: u64,
    pub max_tasks: usize,
    pub mail_to: String,
    pub vapid_private_key: PathBuf,
    pub push_ttl: u32,
    pub urgency: Urgency,
    pub status_code_to_delete: Vec<u16>,
    pub notification_icon: String,
    pub notification_badge: String,
}

fn var(key: &str) -> Result<String, Error> {
    let value = env::var(key).with_context(|| format!("{} is not set", key))?;
    Ok(value)
}

fn manifest_path(value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join(path)
}

pub fn get_configuration() -> Result<Config, Error> {
    let server_host = var("SERVER_HOST")?;
    let port: u16 = var("PORT")?.parse()?;
    let allowed_origins = parse_list(&var("ALLOWED_ORIGINS")?);

    let static_dir = env::var("STATIC_DIRECTORY")
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map(|dir| manifest_path(dir.trim()).to_string_lossy().into_owned());

    let timeout = var("TIMEOUT")?.parse()?;
    let max_tasks: usize = var("MAX_TASKS")?.parse()?;
    if max_tasks == 0 {
        return Err(Error::ConfigurationError(String::from(
            "MAX_TASKS must be greater than 0",
        )));
    }

    let mail_to = var("MAIL_TO")?;
    let vapid_private_key = manifest_path(&var("VAPID_PRIVATE_KEY")?);
    let push_ttl: u32 = var("PUSH_TTL")?.parse()?;
    let urgency: Urgency = var("URGENCY")?.parse().map_err(|_| {
        Error::ConfigurationError(String::from(
            "URGENCY must be one of very-low, low, normal, high",
        ))
    })?;

    let mut status_code_to_delete = vec![];
    for code in parse_list(&var("STATUS_CODE_TO_DELETE")?) {
        status_code_to_delete.push(code.parse::<u16>()?);
    }

    let notification_icon = var("NOTIFICATION_ICON")?;
    let notification_badge = var("NOTIFICATION_BADGE")?;

    let config = Config {
        server_host,
        port,
        allowed_origins,
        static_dir,
        timeout,
        max_tasks,
        mail_to,
        vapid_private_key,
        push_ttl,
        urgency,
        status_code_to_delete,
        notification_icon,
        notification_badge,
    };

    Ok(config)
}

/// Loads `relay.conf` and the optional `.env` into the process environment.
/// Variables already present in the environment win over both files, and
/// `.env` wins over `relay.conf`.
pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = "relay.conf";
    let env_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let config_path = format!("{}/{}", directory, config_file);
    let env_path = format!("{}/{}", directory, env_file);

    let mut values: HashMap<String, String> = HashMap::new();

    let config_string = fs::read_to_string(config_path)?;
    values.extend(parse_config_string(&config_string));

    if Path::new(&env_path).exists() {
        let env_string = fs::read_to_string(env_path)?;
        values.extend(parse_config_string(&env_string));
    }

    for (key, value) in values {
        if env::var_os(&key).is_none() {
            env::set_var(key, value);
        }
    }

    Ok(())
}

fn parse_config_string(config: &str) -> Vec<(String, String)> {
    config
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
