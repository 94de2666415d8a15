use crate::api::VrchatApi;
use crate::app::App;
use crate::commands::{prompt, prompt_secret};
use crate::error::{JoinerError, Result};

pub async fn login(
    app: &App,
    username: &str,
    password: Option<String>,
    code: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_secret("Password: ").await?,
    };

    if !app.api.authenticate(&app.session, username, &password).await? {
        return Err(JoinerError::Custom("Login failed: credentials rejected".into()));
    }

    if app.session.read().await.requires_two_factor() {
        let code = match code {
            Some(c) => c,
            None => prompt("Two-factor code: ").await?,
        };
        if !app.api.verify_two_factor(&app.session, &code).await? {
            return Err(JoinerError::Custom("Login failed: invalid two-factor code".into()));
        }
    }

    println!("Logged in as {username}");
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.restore_session().await;
    app.api.logout(&app.session).await;
    println!("Logged out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DataStorage;
    use std::time::Duration;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_login_with_given_password_saves_token() {
        let dir = tempdir().unwrap();
        let app = App::with_api_delay(dir.path(), Duration::ZERO);

        login(&app, "user", Some("pw".into()), None).await.unwrap();
        assert!(app.session.is_authenticated().await);
        assert!(!app.storage.load_auth_token().await.is_empty());
    }

    #[tokio::test]
    async fn test_login_rejects_empty_password_for_two_factor_account() {
        let dir = tempdir().unwrap();
        let app = App::with_api_delay(dir.path(), Duration::ZERO);

        let result = login(&app, "test@example.com", Some(String::new()), Some("123456".into())).await;
        assert!(result.is_err());
        assert!(!app.session.is_authenticated().await);
    }
}
