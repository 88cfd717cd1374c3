use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings{
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub jwt: JWTSettings,
    pub payment: PaymentSettings,
    pub storage: StorageSettings
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApplicationSettings{
    pub host: String,
    pub port: u16
}

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseSettings{
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub name: String
}

impl DatabaseSettings {
    // Server level url, used to create fresh databases
    pub fn get_database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port
        )
    }

    pub fn get_database_table_url(&self) -> String {
        format!("{}/{}", self.get_database_url(), self.name)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct JWTSettings{
    pub secret: SecretString,
    pub expiry_hours: u64,
    pub issuer: String,
    pub audience: String
}

#[derive(Deserialize, Debug, Clone)]
pub struct PaymentSettings{
    pub api_uri: String,
    pub secret_key: SecretString,
    pub timeout_milliseconds: u64
}

#[derive(Deserialize, Debug, Clone)]
pub struct StorageSettings{
    pub endpoint: String,
    pub bucket: String,
    pub access_token: SecretString,
    pub public_url: String,
    pub timeout_milliseconds: u64
}

impl Settings{
    // `APP_DATABASE__HOST=db` overrides `database.host` from base.yaml
    pub fn get() -> Result<Self, ConfigError>{
        Config::builder()
            .add_source(File::with_name("configuration/base.yaml"))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?
            .try_deserialize::<Settings>()
    }
}
