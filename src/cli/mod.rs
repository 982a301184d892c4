use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;

use commands::{init_database, migrate_and_serve, serve};

#[derive(Parser)]
#[command(name = "budget-manager")]
#[command(about = "Personal budget tracking API with CLI tools and web server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Database URL
        ///
        /// For SQLite databases, use:
        ///   - sqlite://budget_manager.db (relative path)
        ///   - sqlite:///absolute/path/to/budget_manager.db (absolute path)
        #[arg(
            short,
            long,
            env = "DATABASE_URL",
            default_value = "sqlite://budget_manager.db"
        )]
        database_url: String,
        /// Address to bind the HTTP server to
        #[arg(short, long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3000")]
        bind_address: String,
    },
    /// Initialize the database using migrations
    InitDb {
        /// Database URL
        #[arg(
            short,
            long,
            env = "DATABASE_URL",
            default_value = "sqlite://budget_manager.db"
        )]
        database_url: String,
    },
    /// Apply pending migrations and then start the web server
    MigrateAndServe {
        /// Database URL
        #[arg(
            short,
            long,
            env = "DATABASE_URL",
            default_value = "sqlite://budget_manager.db"
        )]
        database_url: String,
        /// Address to bind the HTTP server to
        #[arg(short, long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3000")]
        bind_address: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve {
                database_url,
                bind_address,
            } => {
                serve(&database_url, &bind_address).await?;
            }
            Commands::InitDb { database_url } => {
                init_database(&database_url).await?;
            }
            Commands::MigrateAndServe {
                database_url,
                bind_address,
            } => {
                migrate_and_serve(&database_url, &bind_address).await?;
            }
        }
        Ok(())
    }
}
