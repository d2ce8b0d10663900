// PgStore against a live database. Runs only when DATABASE_URL is set
// (directly or through .env); otherwise each test returns early.

use anyhow::Result;
use chrono::{Duration, FixedOffset, TimeZone, Utc};

use carewatch_api::config::{DatabaseConfig, StoreBackend};
use carewatch_api::database::models::{StatusEvent, UserParticulars};
use carewatch_api::database::{DatabaseError, DatabaseManager, PgStore, Store};

async fn pg_store() -> Result<Option<PgStore>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PgStore test");
        return Ok(None);
    };

    let config = DatabaseConfig {
        backend: StoreBackend::Postgres,
        url: Some(url),
        max_connections: 4,
        connection_timeout: 10,
    };
    let pool = DatabaseManager::connect(&config).await?;
    DatabaseManager::ensure_schema(&pool).await?;
    Ok(Some(PgStore::new(pool)))
}

/// Ids unique to one test run so reruns against the same database never collide
fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

fn event(device: &str, status: &str, minute: i64) -> StatusEvent {
    let base = Utc.with_ymd_and_hms(2025, 1, 31, 23, 0, 0).unwrap();
    let sgt = FixedOffset::east_opt(8 * 3600).unwrap();
    StatusEvent::new(device, status, base + Duration::minutes(minute), sgt)
}

fn particulars(id: &str, email: &str) -> UserParticulars {
    UserParticulars {
        id: id.to_string(),
        elderly_name: "Tan Ah Kow".to_string(),
        elderly_address: "#04-1234, 570, 560570".to_string(),
        caregiver_name: "John Lim".to_string(),
        caregiver_phone: "+65 91234567".to_string(),
        caregiver_email: email.to_string(),
        password_hash: "unused".to_string(),
        role: "caregiver".to_string(),
    }
}

#[tokio::test]
async fn latest_uses_instant_not_display_string() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };
    let dev1 = unique("dev1");
    let dev2 = unique("dev2");

    // "23:59:00 31/01/25" sorts above "07:30:00 01/02/25" as text but is earlier
    store.insert_status(&event(&dev1, "OK", -421)).await?;
    store.insert_status(&event(&dev1, "FALL", 30)).await?;
    store.insert_status(&event(&dev2, "OK", 0)).await?;

    let all = store.latest_statuses(None).await?;
    let row = all.iter().find(|r| r.device_id == dev1).expect("dev1 in latest");
    assert_eq!(row.latest_status, "FALL");
    assert_eq!(all.iter().filter(|r| r.device_id == dev1).count(), 1);
    assert!(all.iter().any(|r| r.device_id == dev2));

    let only = store.latest_statuses(Some(&dev2)).await?;
    assert_eq!(only.len(), 1);
    assert_eq!(only[0].device_id, dev2);
    assert_eq!(only[0].latest_status, "OK");

    Ok(())
}

#[tokio::test]
async fn history_is_newest_first_with_ties_by_insertion() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };
    let dev = unique("dev");

    store.insert_status(&event(&dev, "first", 0)).await?;
    store.insert_status(&event(&dev, "second", 0)).await?;
    store.insert_status(&event(&dev, "third", 5)).await?;

    let statuses: Vec<String> = store.history(&dev).await?.into_iter().map(|e| e.status).collect();
    assert_eq!(statuses, vec!["third", "second", "first"]);

    let rows = store.history(&dev).await?;
    assert_eq!(rows[0].timestamp, "07:05:00 01/02/25");
    assert_eq!(rows[0].recorded_at, Utc.with_ymd_and_hms(2025, 1, 31, 23, 5, 0).unwrap());

    Ok(())
}

#[tokio::test]
async fn insert_if_absent_keeps_first_record() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };
    let id = unique("dev");
    let first_email = format!("{}-a@example.com", id);

    assert!(store.insert_particulars_if_absent(&particulars(&id, &first_email)).await?);
    let second = particulars(&id, &format!("{}-b@example.com", id));
    assert!(!store.insert_particulars_if_absent(&second).await?);

    let stored = store.find_particulars(&id).await?.expect("record exists");
    assert_eq!(stored.caregiver_email, first_email);
    assert_eq!(store.find_particulars_by_email(&first_email).await?, Some(stored));

    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };
    let email = format!("{}@example.com", unique("shared"));

    store.insert_particulars_if_absent(&particulars(&unique("dev"), &email)).await?;
    let err = store
        .insert_particulars_if_absent(&particulars(&unique("dev"), &email))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)), "got {:?}", err);

    Ok(())
}

#[tokio::test]
async fn password_hash_is_replaced_in_place() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };
    let id = unique("dev");
    store
        .insert_particulars_if_absent(&particulars(&id, &format!("{}@example.com", id)))
        .await?;

    assert!(store.set_password_hash(&id, "rotated").await?);
    assert!(!store.set_password_hash(&unique("ghost"), "rotated").await?);
    assert_eq!(store.find_particulars(&id).await?.expect("record").password_hash, "rotated");

    Ok(())
}

#[tokio::test]
async fn health_check_reaches_database() -> Result<()> {
    let Some(store) = pg_store().await? else { return Ok(()) };
    store.health_check().await?;
    Ok(())
}
