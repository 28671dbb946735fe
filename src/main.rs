use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use goal_oracle::adapters::geo::GoogleMapsTimezoneResolver;
use goal_oracle::adapters::postgres::{
    self, PostgresAccessList, PostgresEvaluationRepository, PostgresGoalRepository,
    PostgresGoalTypeRepository, PostgresPendingRatingRepository, PostgresUserGoalRepository,
    PostgresUserRepository,
};
use goal_oracle::adapters::redis::{self as redis_adapter, RedisCache};
use goal_oracle::adapters::vk::{VkClient, VkLongPoll};
use goal_oracle::application::{AppContext, AppDependencies};
use goal_oracle::config::{AppConfig, RuntimeConfig};
use goal_oracle::ports::{SystemClock, TimezoneResolver};

fn init_tracing(runtime: &RuntimeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(runtime.log_level.as_str()));

    if runtime.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.runtime);

    let pool = postgres::connect(&config.database).await?;
    if config.database.run_migrations {
        postgres::migrate(&pool).await?;
        tracing::info!("migrations applied");
    }
    let redis = redis_adapter::connect(&config.redis).await?;
    let vk = Arc::new(VkClient::new(&config.vk)?);

    let timezone_resolver = GoogleMapsTimezoneResolver::from_config(&config.geo)?
        .map(|resolver| Arc::new(resolver) as Arc<dyn TimezoneResolver>);
    if timezone_resolver.is_none() {
        tracing::warn!("no Google Maps key configured, new users get the default timezone");
    }

    let deps = AppDependencies {
        goal_types: Arc::new(PostgresGoalTypeRepository::new(pool.clone())),
        goals: Arc::new(PostgresGoalRepository::new(pool.clone())),
        user_goals: Arc::new(PostgresUserGoalRepository::new(pool.clone())),
        evaluations: Arc::new(PostgresEvaluationRepository::new(pool.clone())),
        pending_ratings: Arc::new(PostgresPendingRatingRepository::new(pool.clone())),
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        access: Arc::new(PostgresAccessList::new(pool)),
        cache: Arc::new(RedisCache::new(redis)),
        transport: vk.clone(),
        timezone_resolver,
        clock: Arc::new(SystemClock),
    };

    let context = Arc::new(AppContext::new(deps, config.app_settings()?));
    let running = context.start().await?;

    let (stop_tx, stop_rx) = watch::channel(false);
    let long_poll = VkLongPoll::new(vk, config.vk.group_id, config.vk.long_poll_wait());
    let listener = tokio::spawn({
        let context = context.clone();
        async move { long_poll.run(context, stop_rx).await }
    });

    tracing::info!("goal oracle running");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");

    let _ = stop_tx.send(true);
    if let Err(e) = listener.await {
        tracing::error!(error = %e, "long poll task panicked");
    }
    running.shutdown().await;

    tracing::info!("goal oracle stopped");
    Ok(())
}
