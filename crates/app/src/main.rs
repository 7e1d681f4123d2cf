//! Feria Operator CLI

use std::process;

use clap::{Args, Parser, Subcommand};
use feria_app::{
    auth::{NewUser, PgAuthService, UserUuid},
    database,
    domain::tenants::{
        PgTenantsService, TenantsService,
        data::{NewStaffMember, NewTenant},
        records::TenantUuid,
    },
};
use jiff::Timestamp;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "feria-app", about = "Feria operator CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Tenant(TenantCommand),
    User(UserCommand),
    Session(SessionCommand),
}

#[derive(Debug, Args)]
struct TenantCommand {
    #[command(subcommand)]
    command: TenantSubcommand,
}

#[derive(Debug, Subcommand)]
enum TenantSubcommand {
    Create(CreateTenantArgs),
    AddStaff(AddStaffArgs),
}

#[derive(Debug, Args)]
struct CreateTenantArgs {
    /// Store display name
    #[arg(long)]
    name: String,

    /// URL-safe store identifier; derived from the name when omitted
    #[arg(long)]
    slug: Option<String>,

    /// User that owns the store
    #[arg(long)]
    owner_uuid: Uuid,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional store UUID; generated when omitted
    #[arg(long)]
    tenant_uuid: Option<Uuid>,
}

#[derive(Debug, Args)]
struct AddStaffArgs {
    /// Store the user joins
    #[arg(long)]
    tenant_uuid: Uuid,

    /// User granted staff access
    #[arg(long)]
    user_uuid: Uuid,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

#[derive(Debug, Args)]
struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    Create(CreateUserArgs),
}

#[derive(Debug, Args)]
struct CreateUserArgs {
    /// Account email, unique across the marketplace
    #[arg(long)]
    email: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<Uuid>,
}

#[derive(Debug, Args)]
struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    Issue(IssueSessionArgs),
    Revoke(RevokeSessionArgs),
}

#[derive(Debug, Args)]
struct IssueSessionArgs {
    /// User the session belongs to
    #[arg(long)]
    user_uuid: Uuid,

    /// Optional expiration timestamp (RFC 3339); never expires when omitted
    #[arg(long)]
    expires_at: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

#[derive(Debug, Args)]
struct RevokeSessionArgs {
    /// Session UUID to revoke
    #[arg(long)]
    session_uuid: Uuid,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Tenant(TenantCommand {
            command: TenantSubcommand::Create(args),
        }) => create_tenant(args).await,
        Commands::Tenant(TenantCommand {
            command: TenantSubcommand::AddStaff(args),
        }) => add_staff(args).await,
        Commands::User(UserCommand {
            command: UserSubcommand::Create(args),
        }) => create_user(args).await,
        Commands::Session(SessionCommand {
            command: SessionSubcommand::Issue(args),
        }) => issue_session(args).await,
        Commands::Session(SessionCommand {
            command: SessionSubcommand::Revoke(args),
        }) => revoke_session(args).await,
    }
}

async fn create_tenant(args: CreateTenantArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let slug = match args.slug {
        Some(slug) => slug,
        None => slugify(&args.name),
    };

    if slug.is_empty() {
        return Err("slug cannot be empty; pass --slug explicitly".to_string());
    }

    let service = PgTenantsService::new(pool);

    let tenant = service
        .create_tenant(NewTenant {
            uuid: args
                .tenant_uuid
                .map_or_else(TenantUuid::new, TenantUuid::from_uuid),
            name: args.name,
            slug,
            owner_uuid: UserUuid::from_uuid(args.owner_uuid),
        })
        .await
        .map_err(|error| format!("failed to create store: {error}"))?;

    println!("tenant_uuid: {}", tenant.uuid);
    println!("tenant_name: {}", tenant.name);
    println!("tenant_slug: {}", tenant.slug);

    Ok(())
}

async fn add_staff(args: AddStaffArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    PgTenantsService::new(pool)
        .add_staff_member(NewStaffMember {
            tenant_uuid: TenantUuid::from_uuid(args.tenant_uuid),
            user_uuid: UserUuid::from_uuid(args.user_uuid),
        })
        .await
        .map_err(|error| format!("failed to add staff member: {error}"))?;

    println!("tenant_uuid: {}", args.tenant_uuid);
    println!("user_uuid: {}", args.user_uuid);

    Ok(())
}

async fn create_user(args: CreateUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let user = PgAuthService::new(pool)
        .create_user(NewUser {
            uuid: args
                .user_uuid
                .map_or_else(UserUuid::new, UserUuid::from_uuid),
            email: args.email,
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_email: {}", user.email);

    Ok(())
}

async fn issue_session(args: IssueSessionArgs) -> Result<(), String> {
    let expires_at = parse_expires_at(args.expires_at.as_deref())?;

    if let Some(expires_at) = expires_at.as_ref()
        && *expires_at <= Timestamp::now()
    {
        return Err("expires-at must be in the future".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let issued = PgAuthService::new(pool)
        .issue_session(args.user_uuid, expires_at)
        .await
        .map_err(|error| format!("failed to issue session: {error}"))?;

    println!("session_uuid: {}", issued.metadata.uuid);
    println!("user_uuid: {}", issued.metadata.user_uuid);
    if let Some(expires_at) = issued.metadata.expires_at {
        println!("session_expires_at: {expires_at}");
    }
    println!("session_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}

async fn revoke_session(args: RevokeSessionArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let revoked = PgAuthService::new(pool)
        .revoke_session(args.session_uuid)
        .await
        .map_err(|error| format!("failed to revoke session: {error}"))?;

    if revoked {
        println!("session revoked: {}", args.session_uuid);
    } else {
        println!("session was not active: {}", args.session_uuid);
    }

    Ok(())
}

fn parse_expires_at(raw: Option<&str>) -> Result<Option<Timestamp>, String> {
    raw.map(|value| {
        value
            .parse::<Timestamp>()
            .map_err(|error| format!("invalid expires-at timestamp: {error}"))
    })
    .transpose()
}

/// Derive a URL-safe slug from a store name. Common Spanish diacritics
/// fold to their base letter; everything else non-alphanumeric becomes
/// a single dash.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());

    for ch in name.to_lowercase().chars() {
        let mapped = match ch {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        };

        if mapped.is_ascii_alphanumeric() {
            slug.push(mapped);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_folds_spanish_names() {
        assert_eq!(slugify("Artesanías María"), "artesanias-maria");
        assert_eq!(slugify("El Ñandú"), "el-nandu");
        assert_eq!(slugify("  Feria --- Libre  "), "feria-libre");
        assert_eq!(slugify("¡¿!?"), "");
    }
}
