use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "appdeck", about = "Appdeck low-code app builder server")]
pub struct Cli {
    /// Bind host.
    #[arg(long, env = "APPDECK_HOST")]
    pub host: Option<String>,

    /// Bind port.
    #[arg(long, env = "APPDECK_PORT")]
    pub port: Option<u16>,

    /// Admin key; stored and compared as a hash.
    #[arg(long, env = "APPDECK_ADMIN_KEY")]
    pub admin_key: String,

    /// Database DSN; defaults to a sqlite file under the data dir.
    #[arg(long, env = "APPDECK_DSN")]
    pub dsn: Option<String>,

    /// Data directory for the default sqlite database.
    #[arg(long, env = "APPDECK_DATA_DIR", default_value = "./data")]
    pub data_dir: String,

    /// Optional outbound proxy for upstream AI calls.
    #[arg(long, env = "APPDECK_PROXY")]
    pub proxy: Option<String>,

    /// Override for the importable CLI auth file location.
    #[arg(long, env = "APPDECK_AUTH_FILE")]
    pub auth_file: Option<String>,
}
