use clap::{Args, Parser, Subcommand};
use user_directory::{
    cli::{
        blob::{find_orphans, remove_orphans},
        db::{db_list, db_migrate, db_revert},
        user::{user_list, user_seed},
    },
    core::{
        blob::BlobStore,
        db::{init_pg_repository, init_pool, require_database_url},
    },
    settings::get_config,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database related command
    Db(DbArgs),
    /// User records
    User(UserArgs),
    /// Uploaded profile images
    Blob(BlobArgs),
}

#[derive(Debug, Args)]
struct DbArgs {
    #[command(subcommand)]
    command: DbCommands,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// List all migration
    List,
    /// Run all pending migration
    Migrate,
    /// Revert latest migration
    Revert,
}

#[derive(Debug, Args)]
struct UserArgs {
    #[command(subcommand)]
    command: UserCommands,
}

#[derive(Debug, Subcommand)]
enum UserCommands {
    /// Create users with fake data
    Seed {
        #[arg(short, long, default_value_t = 10)]
        count: u32,
    },
    /// List all users
    List,
}

#[derive(Debug, Args)]
struct BlobArgs {
    #[command(subcommand)]
    command: BlobCommands,
}

#[derive(Debug, Subcommand)]
enum BlobCommands {
    /// List images no user refers to
    Orphans {
        /// Delete them as well
        #[arg(long)]
        remove: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();
    let config = get_config()?;
    match &cli.command {
        Commands::Db(db_args) => {
            let pool = init_pool(require_database_url(&config)?).await?;
            match &db_args.command {
                DbCommands::List => {
                    for item in db_list(&pool).await? {
                        let status = if item.applied { "applied" } else { "pending" };
                        println!("{} {} ({})", item.version, item.description, status);
                    }
                }
                DbCommands::Migrate => {
                    println!("run all pending migration");
                    db_migrate(&pool).await?;
                }
                DbCommands::Revert => match db_revert(&pool).await? {
                    Some(version) => println!("reverted migration {}", version),
                    None => println!("no migration to revert"),
                },
            }
        }
        Commands::User(user_args) => {
            let db = init_pg_repository(&config).await?;
            let blobs = BlobStore::init(&config.upload_dir).await?;
            match &user_args.command {
                UserCommands::Seed { count } => {
                    let users = user_seed(db.as_ref(), &blobs, *count).await?;
                    println!("created {} users", users.len());
                }
                UserCommands::List => {
                    for user in user_list(db.as_ref()).await? {
                        println!(
                            "{}\t{} {}\t{}\t{}\t{}",
                            user.id,
                            user.first_name,
                            user.last_name,
                            user.email,
                            user.phone,
                            user.profile_image
                        );
                    }
                }
            }
        }
        Commands::Blob(blob_args) => {
            let db = init_pg_repository(&config).await?;
            let blobs = BlobStore::init(&config.upload_dir).await?;
            match &blob_args.command {
                BlobCommands::Orphans { remove } => {
                    let orphans = if *remove {
                        remove_orphans(db.as_ref(), &blobs).await?
                    } else {
                        find_orphans(db.as_ref(), &blobs).await?
                    };
                    for name in orphans.iter() {
                        println!("{}", name);
                    }
                    if *remove {
                        println!("removed {} files", orphans.len());
                    }
                }
            }
        }
    }
    Ok(())
}
