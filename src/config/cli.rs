use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "airtable-upload", version)]
#[command(about = "Import CSV data from stdin to an existing AirTable table")]
pub struct CliArgs {
    /// API key for AirTable, defaults to environment variable AIRTABLE_API_KEY
    #[arg(long, env = "AIRTABLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base key for AirTable, defaults to environment variable AIRTABLE_BASE_KEY
    #[arg(long, env = "AIRTABLE_BASE_KEY")]
    pub base_key: Option<String>,

    /// Name of table in AirTable
    #[arg(short = 't', long = "table")]
    pub table: String,

    /// Update the existing row matching --id-field instead of inserting a duplicate
    #[arg(short = 'u', long)]
    pub update: bool,

    /// Replace the existing row matching --id-field instead of inserting a duplicate
    #[arg(short = 'r', long)]
    pub replace: bool,

    /// List any fields that are attachment type
    #[arg(short = 'a', long = "attachment-fields", num_args = 1..)]
    pub attachment_fields: Vec<String>,

    /// Name of primary field, only needed with --update or --replace
    #[arg(long)]
    pub id_field: Option<String>,

    /// Input is json (default is CSV)
    #[arg(long)]
    pub json: bool,

    /// Let AirTable convert text values to the column types
    #[arg(long)]
    pub typecast: bool,

    /// AirTable API root
    #[arg(long, env = "AIRTABLE_API_URL")]
    pub endpoint: Option<String>,

    /// Optional TOML profile providing defaults for keys and endpoint
    #[arg(short = 'c', long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
