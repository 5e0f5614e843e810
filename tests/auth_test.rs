mod common;

use common::test_context;
use gymkeeper::{auth, error::AppError};

#[tokio::test]
async fn test_bootstrap_forces_password_change_once() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let auth_service = &ctx.auth_service;

    assert!(auth_service.bootstrap("admin", "admin123").await?);
    assert!(auth_service.is_force_password_change().await?);
    assert!(auth_service.login("admin", "admin123").await?);

    // A second start must not recreate the account or reset the flag.
    auth_service.change_password("admin", "s3cret-pass").await?;
    assert!(!auth_service.bootstrap("admin", "admin123").await?);
    assert!(!auth_service.is_force_password_change().await?);

    assert!(auth_service.login("admin", "s3cret-pass").await?);
    assert!(!auth_service.login("admin", "admin123").await?);

    Ok(())
}

#[tokio::test]
async fn test_login_rejects_unknown_user_and_wrong_password() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    ctx.auth_service.bootstrap("admin", "admin123").await?;

    assert!(!ctx.auth_service.login("nobody", "admin123").await?);
    assert!(!ctx.auth_service.login("admin", "wrong").await?);

    Ok(())
}

#[tokio::test]
async fn test_change_password_for_missing_admin() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let result = ctx.auth_service.change_password("ghost", "whatever").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_long_passwords_compare_on_first_72_bytes() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    ctx.auth_service.bootstrap("admin", "admin123").await?;

    let long = "x".repeat(auth::BCRYPT_MAX_PASSWORD_BYTES);
    ctx.auth_service.change_password("admin", &format!("{}tail", long)).await?;

    assert!(ctx.auth_service.login("admin", &format!("{}other", long)).await?);
    assert!(ctx.auth_service.login("admin", &long).await?);
    assert!(!ctx.auth_service.login("admin", &long[1..]).await?);

    Ok(())
}

#[tokio::test]
async fn test_sessions() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let auth_service = &ctx.auth_service;
    auth_service.bootstrap("admin", "admin123").await?;

    let (session, token) = auth_service.create_session("admin", 24).await?;
    assert_eq!(session.username, "admin");
    assert_ne!(session.token_hash, token);

    let found = auth_service.validate_session(&token).await?;
    assert_eq!(found.map(|s| s.id), Some(session.id));

    let (_, other_token) = auth_service.create_session("admin", 24).await?;
    assert_eq!(auth_service.revoke_other_sessions("admin", &token).await?, 1);
    assert!(auth_service.validate_session(&other_token).await?.is_none());
    assert!(auth_service.validate_session(&token).await?.is_some());

    auth_service.invalidate_session(&token).await?;
    assert!(auth_service.validate_session(&token).await?.is_none());

    let (_, expired_token) = auth_service.create_session("admin", -1).await?;
    assert!(auth_service.validate_session(&expired_token).await?.is_none());
    assert_eq!(auth_service.cleanup_expired_sessions().await?, 1);

    Ok(())
}
