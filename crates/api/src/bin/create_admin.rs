//! Create the platform admin account from environment variables.
//!
//! | Env Var              | Required |
//! |----------------------|----------|
//! | `DATABASE_URL`       | yes      |
//! | `DB_MAX_CONNECTIONS` | no       |
//! | `ADMIN_USERNAME`     | yes      |
//! | `ADMIN_EMAIL`        | yes      |
//! | `ADMIN_PASSWORD`     | yes      |
//!
//! Running it again once the admin exists is a no-op.

use anyhow::{bail, Context};
use sponnect_core::directory::validate_password;
use sponnect_core::roles::Role;
use sponnect_db::models::user::CreateUser;
use sponnect_db::repositories::UserRepo;

use sponnect_api::auth::password::hash_password;
use sponnect_api::config::{required, DatabaseConfig};
use sponnect_api::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    telemetry::init("create_admin=info,sponnect_db=info");

    let database = DatabaseConfig::from_env()?;
    let username = required("ADMIN_USERNAME")?.trim().to_string();
    let email = required("ADMIN_EMAIL")?;
    let password = required("ADMIN_PASSWORD")?;
    validate_password(&password)?;

    let pool = sponnect_db::create_pool(&database.url, database.max_connections)
        .await
        .context("Failed to connect to database")?;
    sponnect_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    if let Some(existing) = UserRepo::find_by_username(&pool, &username).await? {
        if existing.role()? != Role::Admin {
            bail!("User '{username}' exists and is not an admin");
        }
        tracing::info!(user_id = existing.id, %username, "Admin already exists, nothing to do");
        return Ok(());
    }

    let password_hash = hash_password(&password)?;

    let admin = UserRepo::create(
        &pool,
        &CreateUser {
            username: username.clone(),
            email: email.trim().to_lowercase(),
            password_hash,
            role: Role::Admin,
            sponsor_approved: true,
            company_name: None,
            industry: None,
            influencer_name: None,
            category: None,
            niche: None,
            reach: None,
        },
    )
    .await
    .context("Failed to create admin user")?;

    tracing::info!(user_id = admin.id, %username, "Admin user created");
    Ok(())
}
