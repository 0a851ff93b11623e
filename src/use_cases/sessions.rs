use uuid::Uuid;

use crate::domain::entities::{FlashMessage, SessionData, SessionRecord};
use crate::domain::ports::{Clock, SessionStore};

// Fixed session lifetime from creation (one week). Activity does not
// extend it.
pub const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

// Idle threshold before touched_at is refreshed. Touching on every
// request would amplify writes on the store for no benefit.
pub const TOUCH_AFTER_SECONDS: i64 = 24 * 60 * 60;

// Creates a new session row with a fresh identifier.
pub struct IssueSessionUseCase<C, S> {
    pub clock: C,
    pub store: S,
}

impl<C, S> IssueSessionUseCase<C, S>
where
    C: Clock,
    S: SessionStore,
{
    pub async fn execute(&self, data: SessionData) -> Result<SessionRecord, String> {
        let now = self.clock.now_epoch_seconds();
        let record = SessionRecord {
            id: Uuid::new_v4(),
            data,
            created_at: now,
            expires_at: now + SESSION_TTL_SECONDS,
            touched_at: now,
        };

        self.store.insert(record.clone()).await?;
        Ok(record)
    }
}

// Outcome of resolving a cookie-carried session identifier.
#[derive(Clone, Debug)]
pub enum ResolvedSession {
    Anonymous,
    Active(SessionRecord),
}

// Maps a session identifier to a stored session, enforcing expiry and the
// touch policy. Absent or expired sessions resolve as anonymous; expired
// rows are removed on observation.
pub struct ResolveSessionUseCase<C, S> {
    pub clock: C,
    pub store: S,
    pub touch_after_seconds: i64,
}

impl<C, S> ResolveSessionUseCase<C, S>
where
    C: Clock,
    S: SessionStore,
{
    pub async fn execute(&self, id: Uuid) -> Result<ResolvedSession, String> {
        let Some(mut record) = self.store.get(id).await? else {
            return Ok(ResolvedSession::Anonymous);
        };

        let now = self.clock.now_epoch_seconds();
        if record.expires_at <= now {
            self.store.remove(id).await?;
            return Ok(ResolvedSession::Anonymous);
        }

        if now - record.touched_at >= self.touch_after_seconds {
            self.store.touch(id, now).await?;
            record.touched_at = now;
        }

        Ok(ResolvedSession::Active(record))
    }
}

// Removes a session row, if present.
pub struct DestroySessionUseCase<S> {
    pub store: S,
}

impl<S> DestroySessionUseCase<S>
where
    S: SessionStore,
{
    pub async fn execute(&self, id: Uuid) -> Result<bool, String> {
        self.store.remove(id).await
    }
}

// Flash messages live inside the session payload: pushed for the next
// rendered view, taken exactly once.
pub struct FlashUseCase<S> {
    pub store: S,
}

impl<S> FlashUseCase<S>
where
    S: SessionStore,
{
    // Appends a flash to the session. Returns false when the session row
    // no longer exists (expired between resolution and write).
    pub async fn push(&self, id: Uuid, flash: FlashMessage) -> Result<bool, String> {
        let Some(mut record) = self.store.get(id).await? else {
            return Ok(false);
        };

        record.data.flash.push(flash);
        self.store.update_data(id, record.data).await?;
        Ok(true)
    }

    // Drains the session's flash messages, clearing them in the store so
    // the next read sees none.
    pub async fn take(&self, record: &SessionRecord) -> Result<Vec<FlashMessage>, String> {
        if record.data.flash.is_empty() {
            return Ok(Vec::new());
        }

        let mut cleared = record.data.clone();
        let taken = std::mem::take(&mut cleared.flash);
        self.store.update_data(record.id, cleared).await?;
        Ok(taken)
    }
}
