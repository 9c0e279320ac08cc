use std::path::PathBuf;

use clap::Parser;
use sekisho::{
    ClientSeedConfig, DataSeedContext, EndpointConfig, EndpointResolver, SekishoBuilder, TenantId,
};
use tracing_subscriber::EnvFilter;

/// Command line interface for Sekisho
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://sekisho.db")]
    db_url: String,

    /// appsettings JSON file with `AuthServer` and `RemoteServices` sections
    #[arg(long, env = "SEKISHO_SETTINGS")]
    settings: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(clap::Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Create the shared client application and optionally provision a tenant
    Seed {
        #[arg(long)]
        tenant_id: Option<String>,
    },
    /// Create a tenant
    CreateTenant { name: String },
    /// Register a tenant's redirect URIs on the shared client application
    Provision { tenant_id: String },
    /// Print the authority and API base URL a front end served from HOST would use
    Resolve {
        #[arg(long)]
        host: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };

    match &cli.command {
        Commands::Version => {
            println!("Sekisho v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Resolve { host, json } => {
            let config = match &settings {
                Some(settings) => EndpointConfig::from_json_str(settings)?,
                None => EndpointConfig::from_env()?,
            };
            let resolver = EndpointResolver::new(config);
            let resolved = resolver.resolve(host)?;
            if *json {
                let output = serde_json::json!({
                    "tenant": resolved.tenant.as_ref().map(|label| label.segment()),
                    "authority": resolved.authority,
                    "api_base_url": resolved.api_base_url,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("authority:    {}", resolved.authority);
                println!("api base url: {}", resolved.api_base_url);
            }
            return Ok(());
        }
        _ => {}
    }

    let sekisho = SekishoBuilder::new()
        .with_sqlite(&cli.db_url)
        .await?
        .with_client_config(ClientSeedConfig::from_env())
        .apply_migrations(!matches!(cli.command, Commands::Migrate))
        .build()
        .await?;

    match cli.command {
        Commands::Migrate => {
            println!("Running migrations...");
            sekisho.migrate().await?;
        }
        Commands::Seed { tenant_id } => {
            let context = DataSeedContext {
                tenant_id: tenant_id.map(TenantId::new).transpose()?,
            };
            let report = sekisho.seed(&context).await?;
            println!("client created: {}", report.client_created);
            if let Some(outcome) = report.provisioning {
                println!("provisioning:   {outcome:?}");
            }
        }
        Commands::CreateTenant { name } => {
            let tenant = sekisho.create_tenant(&name).await?;
            println!("{}", tenant.id);
        }
        Commands::Provision { tenant_id } => {
            let outcome = sekisho.provision_tenant(&TenantId::new(tenant_id)?).await?;
            println!("{outcome:?}");
        }
        Commands::Resolve { .. } | Commands::Version => {}
    }

    Ok(())
}
