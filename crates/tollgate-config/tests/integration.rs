use tollgate_config::{ConfigError, ConfigService, keys};
use tollgate_data::fetch_options;
use tollgate_test_support::postgres::start_postgres;

#[tokio::test]
async fn config_service_persists_accepted_writes() -> anyhow::Result<()> {
    let postgres = match start_postgres() {
        Ok(db) => db,
        Err(err) => {
            eprintln!("skipping config_service_persists_accepted_writes: {err}");
            return Ok(());
        }
    };
    let service = ConfigService::new(postgres.connection_string()).await?;
    let store = service.store();

    assert_eq!(
        store.get_one(keys::AUTOMATIC_DISABLE_STATUS_CODES).await.as_deref(),
        Some("401")
    );

    store.set_validated("RetryTimes", 3_i64).await?;
    store
        .set_validated(keys::GROUP_RATIO, r#"{"default":1,"vip":0.8}"#)
        .await?;

    let rejected = store.set_validated(keys::GROUP_RATIO, "{invalid").await;
    assert!(matches!(rejected, Err(ConfigError::ValidationFailed { .. })));

    let rows = fetch_options(service.pool()).await?;
    let stored: Vec<_> = rows
        .iter()
        .map(|row| (row.key.as_str(), row.value.as_str()))
        .collect();
    assert_eq!(
        stored,
        vec![
            (keys::GROUP_RATIO, r#"{"default":1,"vip":0.8}"#),
            ("RetryTimes", "3"),
        ]
    );

    service.pool().close().await;
    drop(postgres);
    Ok(())
}

#[tokio::test]
async fn persisted_rows_override_defaults_on_reload() -> anyhow::Result<()> {
    let postgres = match start_postgres() {
        Ok(db) => db,
        Err(err) => {
            eprintln!("skipping persisted_rows_override_defaults_on_reload: {err}");
            return Ok(());
        }
    };

    let first = ConfigService::new(postgres.connection_string()).await?;
    first
        .store()
        .set_validated(keys::AUTOMATIC_DISABLE_STATUS_CODES, "401,500-599")
        .await?;
    first
        .store()
        .set_validated(keys::TELEGRAM_BOT_TOKEN, "bot:token")
        .await?;
    first.pool().close().await;

    let reloaded = ConfigService::new(postgres.connection_string()).await?;
    let store = reloaded.store();
    assert_eq!(
        store.get_one(keys::AUTOMATIC_DISABLE_STATUS_CODES).await.as_deref(),
        Some("401,500-599")
    );
    store
        .set_validated(keys::TELEGRAM_OAUTH_ENABLED, true)
        .await?;
    assert!(
        store
            .export()
            .await
            .iter()
            .all(|entry| entry.key != keys::TELEGRAM_BOT_TOKEN)
    );

    reloaded.pool().close().await;
    drop(postgres);
    Ok(())
}
