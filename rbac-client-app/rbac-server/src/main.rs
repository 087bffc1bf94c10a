use std::sync::Arc;

use tracing::{error, info};

use rbac_core::domain::{build_menu_trees, MenuQueryOptions, MenuQueryParams, MenuTree};
use rbac_core::services::MenuService;
use rbac_infrastructure::database::{
    connection, MemoryDatabase, MemoryMenuActionRepository, MemoryMenuActionResourceRepository,
    MemoryMenuRepository, PgMenuActionRepository, PgMenuActionResourceRepository, PgMenuRepository,
    PgTransactionManager,
};
use rbac_infrastructure::{seed, MemoryMenuService, PgMenuService};
use rbac_shared::config::{AppConfig, MenuSettings};
use rbac_shared::id::IdGenerator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry
    rbac_shared::telemetry::init_telemetry(&config.log);
    info!("{} starting ({})", config.app.name, config.app.env);

    let ids = Arc::new(IdGenerator::new(config.snowflake.node_id, config.snowflake.worker_id));

    if config.database.url.is_empty() {
        info!("No database configured, using the in-memory store");
        let service: MemoryMenuService = MenuService::new(
            Arc::new(MemoryDatabase::new()),
            Arc::new(MemoryMenuRepository::new()),
            Arc::new(MemoryMenuActionRepository::new()),
            Arc::new(MemoryMenuActionResourceRepository::new()),
            ids,
        );
        return run(&service, &config.menu).await;
    }

    info!("Connecting to database...");
    let pool = connection::create_pool(&config.database).await?;
    info!("Database connection established.");

    let service: PgMenuService = MenuService::new(
        Arc::new(PgTransactionManager::new(pool)),
        Arc::new(PgMenuRepository::new()),
        Arc::new(PgMenuActionRepository::new()),
        Arc::new(PgMenuActionResourceRepository::new()),
        ids,
    );
    run(&service, &config.menu).await
}

/// Seed the menu table if asked to, then log the resulting hierarchy.
async fn run<T, M, A, R>(service: &MenuService<T, M, A, R>, settings: &MenuSettings) -> anyhow::Result<()>
where
    T: rbac_core::repositories::TransactionManager,
    M: rbac_core::repositories::MenuRepository<Conn = T::Conn>,
    A: rbac_core::repositories::MenuActionRepository<Conn = T::Conn>,
    R: rbac_core::repositories::MenuActionResourceRepository<Conn = T::Conn>,
{
    if settings.seed_on_start {
        match seed::init_data(service, &settings.data_file).await {
            Ok(0) => {}
            Ok(created) => info!("Seeded {} menus from {}", created, settings.data_file),
            Err(e) => {
                error!("Menu seeding failed: {}", e);
                return Err(e.into());
            }
        }
    }

    let menus = service
        .query(&MenuQueryParams::default(), &MenuQueryOptions::default())
        .await?;
    let trees = build_menu_trees(&menus.data);
    info!("Menu hierarchy: {} menus, {} roots", menus.total(), trees.len());
    for tree in &trees {
        log_tree(tree, 0);
    }

    Ok(())
}

fn log_tree(tree: &MenuTree, depth: usize) {
    info!(
        "{}{} [{}] actions={}",
        "  ".repeat(depth),
        tree.name,
        tree.id,
        tree.actions.len()
    );
    for child in &tree.children {
        log_tree(child, depth + 1);
    }
}
