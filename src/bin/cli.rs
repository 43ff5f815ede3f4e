use clap::{Parser, Subcommand};
use recipe_api::{
    config::Settings,
    db,
    repositories::{SqliteTokenRepository, SqliteUserRepository},
    services::{
        auth_service::AuthService,
        user_service::{CreateUserRequest, UpdatePasswordRequest, UserService},
    },
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "recipe-api-cli")]
#[command(about = "CLI tool for managing recipe API users", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create a staff superuser
    CreateSuperuser {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },

    /// Delete a user and everything they own
    Delete {
        /// Email address of the user to delete
        #[arg(short, long)]
        email: String,
    },

    /// Set a new password for a user
    SetPassword {
        /// Email address of the user
        #[arg(short, long)]
        email: String,

        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Issue a new API token for a user
    Token {
        /// Email address of the user
        #[arg(short, long)]
        email: String,
    },
}

fn get_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

/// Uses the given password or prompts twice for one.
fn resolve_password(password: Option<String>, prompt: &str) -> anyhow::Result<String> {
    if let Some(pw) = password {
        return Ok(pw);
    }

    let password = get_password(prompt)?;
    let confirm = get_password("Confirm password")?;
    if password != confirm {
        anyhow::bail!("Passwords do not match");
    }
    Ok(password)
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("❌ {}", message);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();

    // Connect to database
    let pool = db::create_pool(&settings.database_url).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    // Initialize services
    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let token_repository = Arc::new(SqliteTokenRepository::new(pool.clone()));
    let user_service = UserService::new(user_repository.clone());
    let auth_service = AuthService::new(user_repository, token_repository);

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                email,
                name,
                password,
            } => {
                let password = resolve_password(password, "Password").unwrap_or_else(|e| fail(e));
                let request = CreateUserRequest {
                    email,
                    password,
                    name,
                };

                match user_service.create_user(request).await {
                    Ok(user) => {
                        println!("✅ User created successfully!");
                        println!("  ID: {}", user.id);
                        println!("  Email: {}", user.email);
                    }
                    Err(err) => fail(format!("Failed to create user: {}", err)),
                }
            }

            UserCommands::CreateSuperuser { email, password } => {
                let password = resolve_password(password, "Password").unwrap_or_else(|e| fail(e));
                let request = CreateUserRequest {
                    email,
                    password,
                    name: String::new(),
                };

                match user_service.create_superuser(request).await {
                    Ok(user) => {
                        println!("✅ Superuser created successfully!");
                        println!("  ID: {}", user.id);
                        println!("  Email: {}", user.email);
                    }
                    Err(err) => fail(format!("Failed to create superuser: {}", err)),
                }
            }

            UserCommands::List { limit, offset } => {
                match user_service.list_users(Some(limit), Some(offset)).await {
                    Ok(users) if users.is_empty() => println!("No users found."),
                    Ok(users) => {
                        println!(
                            "{:<5} {:<40} {:<20} {:<6} {:<20}",
                            "ID", "Email", "Name", "Staff", "Created"
                        );
                        println!("{}", "-".repeat(95));
                        for user in users {
                            println!(
                                "{:<5} {:<40} {:<20} {:<6} {:<20}",
                                user.id,
                                user.email,
                                user.name,
                                if user.is_staff { "Yes" } else { "No" },
                                user.created_at.as_deref().unwrap_or("N/A")
                            );
                        }
                    }
                    Err(err) => fail(format!("Failed to list users: {}", err)),
                }
            }

            UserCommands::Delete { email } => match user_service.find_user_by_email(&email).await {
                Ok(Some(user)) => match user_service.delete_user(user.id).await {
                    Ok(()) => println!("✅ User '{}' deleted successfully!", user.email),
                    Err(err) => fail(format!("Failed to delete user: {}", err)),
                },
                Ok(None) => fail(format!("User '{}' not found", email)),
                Err(err) => fail(format!("Failed to find user: {}", err)),
            },

            UserCommands::SetPassword { email, password } => {
                match user_service.find_user_by_email(&email).await {
                    Ok(Some(user)) => {
                        let new_password = resolve_password(password, "New password")
                            .unwrap_or_else(|e| fail(e));

                        let request = UpdatePasswordRequest {
                            user_id: user.id,
                            new_password,
                        };

                        match user_service.update_password(request).await {
                            Ok(()) => {
                                println!("✅ Password updated successfully for '{}'!", user.email)
                            }
                            Err(err) => fail(format!("Failed to update password: {}", err)),
                        }
                    }
                    Ok(None) => fail(format!("User '{}' not found", email)),
                    Err(err) => fail(format!("Failed to find user: {}", err)),
                }
            }

            UserCommands::Token { email } => match user_service.find_user_by_email(&email).await {
                Ok(Some(user)) => match auth_service.issue_token(user.id).await {
                    Ok(token) => {
                        println!("✅ Token issued for '{}'", user.email);
                        println!("  {}", token);
                    }
                    Err(err) => fail(format!("Failed to issue token: {}", err)),
                },
                Ok(None) => fail(format!("User '{}' not found", email)),
                Err(err) => fail(format!("Failed to find user: {}", err)),
            },
        },
    }

    Ok(())
}
