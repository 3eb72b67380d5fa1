// tests/credential_manager_tests.rs

mod test_utils;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, TimeZone, Utc};
use tokio_test::assert_err;

use livewatch_core::Error;
use livewatch_core::auth::CredentialManager;
use test_utils::{CountingGrant, ManualClock};

fn manager_with(grant: Arc<CountingGrant>, clock: Arc<ManualClock>) -> CredentialManager {
    CredentialManager::new(grant).with_clock(clock)
}

fn start_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap()))
}

#[tokio::test]
async fn token_is_reused_until_the_safety_margin() -> Result<(), Error> {
    let grant = Arc::new(CountingGrant::new(3600));
    let clock = start_clock();
    let manager = manager_with(grant.clone(), clock.clone());

    assert_eq!(manager.get_token().await?, "tok-1");
    assert_eq!(grant.calls(), 1);

    // fetch + E - 60 - 1s: still cached
    clock.advance(Duration::seconds(3539));
    assert_eq!(manager.get_token().await?, "tok-1");
    assert_eq!(grant.calls(), 1);

    // fetch + E - 60: refreshed
    clock.advance(Duration::seconds(1));
    assert_eq!(manager.get_token().await?, "tok-2");
    assert_eq!(grant.calls(), 2);

    // and the new token is cached in turn
    assert_eq!(manager.get_token().await?, "tok-2");
    assert_eq!(grant.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn short_lived_token_is_fetched_every_time() -> Result<(), Error> {
    let grant = Arc::new(CountingGrant::new(30));
    let manager = manager_with(grant.clone(), start_clock());

    manager.get_token().await?;
    manager.get_token().await?;
    assert_eq!(grant.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn concurrent_callers_share_one_exchange() -> Result<(), Error> {
    let grant = Arc::new(CountingGrant::new(3600).with_delay(StdDuration::from_millis(50)));
    let manager = Arc::new(manager_with(grant.clone(), start_clock()));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.get_token().await })
        })
        .collect();

    for task in tasks {
        let token = task.await.expect("task panicked")?;
        assert_eq!(token, "tok-1");
    }
    assert_eq!(grant.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn rejected_grant_is_not_cached() -> Result<(), Error> {
    let grant = Arc::new(CountingGrant::new(3600));
    grant.fail_next(Some(401));
    let manager = manager_with(grant.clone(), start_clock());

    let err = assert_err!(manager.get_token().await);
    assert!(matches!(err, Error::Auth { status: 401, .. }));
    assert!(manager.cached_expiry().await.is_none());

    // next call tries again and succeeds
    grant.fail_next(None);
    assert_eq!(manager.get_token().await?, "tok-2");
    assert_eq!(grant.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn failed_refresh_drops_the_stale_token() -> Result<(), Error> {
    let grant = Arc::new(CountingGrant::new(120));
    let clock = start_clock();
    let manager = manager_with(grant.clone(), clock.clone());

    manager.get_token().await?;
    clock.advance(Duration::seconds(61));
    grant.fail_next(Some(500));

    assert!(manager.get_token().await.unwrap_err().is_auth());
    assert!(manager.cached_expiry().await.is_none());
    Ok(())
}

#[tokio::test]
async fn invalidate_forces_a_new_exchange() -> Result<(), Error> {
    let grant = Arc::new(CountingGrant::new(3600));
    let manager = manager_with(grant.clone(), start_clock());

    assert_eq!(manager.get_token().await?, "tok-1");
    manager.invalidate().await;
    assert_eq!(manager.get_token().await?, "tok-2");
    assert_eq!(grant.calls(), 2);
    Ok(())
}
