pub mod config;
pub mod habit;
pub mod leaderboard;
pub mod profile;
pub mod stats;
pub mod streak;
pub mod user;

use habitrack_core::date::local_today;
use habitrack_core::{AuthSession, Config, CoreError, HabitService, SessionContext, SqliteStore};

/// Everything a command needs: the store-backed service and who is acting.
pub struct App {
    pub service: HabitService<SqliteStore>,
    pub config: Config,
    auth: AuthSession,
}

impl App {
    pub fn open(config: Config, user: Option<String>) -> Result<Self, CoreError> {
        tracing::debug!(user = ?user, "opening document store");
        let store = SqliteStore::open()?;
        let service = HabitService::new(store).with_points(config.points.per_completion);
        let auth = AuthSession::new();
        if let Some(user) = user {
            auth.sign_in(user);
        }
        Ok(Self {
            service,
            config,
            auth,
        })
    }

    /// Session for the signed-in user on the local calendar date.
    pub fn session(&self) -> Result<SessionContext, CoreError> {
        SessionContext::from_auth(&self.auth, local_today())
    }

    /// Session for commands that act on existing data. Runs the streak guard
    /// first when configured.
    pub fn active_session(&self) -> Result<SessionContext, CoreError> {
        let ctx = self.session()?;
        if self.config.streak.guard_on_start {
            self.service.guard(&ctx);
        }
        Ok(ctx)
    }
}
