use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use orientdb_client::{ClientBuilder, ClientConfig, Document, StorageType};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "orientdb-cli")]
#[command(about = "Talk to an OrientDB server over the binary protocol", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Connection string: user@password:host[:port]/database
    #[arg(long)]
    dsn: Option<String>,

    /// Connection timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an idempotent SQL query
    Query {
        sql: String,
        /// Fetch plan passed to the server
        #[arg(long, default_value = "")]
        fetch_plan: String,
        /// Positional parameters
        #[arg(short, long = "param")]
        params: Vec<String>,
    },
    /// Run a SQL command
    Command {
        sql: String,
        #[arg(short, long = "param")]
        params: Vec<String>,
    },
    /// Print the database schema
    Schema,
    /// Check whether a database exists (server session)
    Exists {
        database: String,
        #[arg(long, default_value = "plocal")]
        storage: String,
    },
}

fn print_documents(docs: &[Document]) -> anyhow::Result<()> {
    for doc in docs {
        println!("{}", serde_json::to_string_pretty(doc)?);
    }
    println!("{} {} document(s)", "•".dimmed(), docs.len());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orientdb_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.dsn {
        Some(dsn) => ClientConfig::from_dsn(dsn)?,
        None => ClientConfig::load(args.config.as_deref())?,
    };

    if matches!(args.command, Commands::Exists { .. }) {
        // Existence checks run on a server session.
        config.database.clear();
    }

    let mut client = ClientBuilder::from_config(&config)
        .timeout_ms(args.timeout_ms)
        .build()
        .await?;

    match args.command {
        Commands::Query {
            sql,
            fetch_plan,
            params,
        } => {
            let params: Vec<&str> = params.iter().map(String::as_str).collect();
            let docs = client.sql_query(&sql, &fetch_plan, &params).await?;
            print_documents(&docs)?;
        }
        Commands::Command { sql, params } => {
            let params: Vec<&str> = params.iter().map(String::as_str).collect();
            let result = client.sql_command(&sql, &params).await?;
            print_documents(&result.documents)?;
            if let Some(scalar) = result.scalar {
                println!("{} {}", "result:".green(), scalar);
            }
        }
        Commands::Schema => {
            let schema = client.load_schema().await?;
            let mut names: Vec<&String> = schema.classes.keys().collect();
            names.sort();
            for name in names {
                let class = &schema.classes[name];
                println!("{}", serde_json::to_string_pretty(class)?);
            }
        }
        Commands::Exists { database, storage } => {
            let storage: StorageType = storage.parse()?;
            let exists = client.database_exists(&database, storage).await?;
            if exists {
                println!("{} {}", database, "exists".green());
            } else {
                println!("{} {}", database, "does not exist".yellow());
            }
        }
    }

    Ok(())
}
