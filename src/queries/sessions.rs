use super::cache::QueryCache;
use crate::db::log::audit_quietly;
use crate::errors::{AppError, AppResult};
use crate::models::session::{NewSession, SessionRow};
use crate::store::{DbClient, Filter, OrderBy, Record};
use crate::utils::formatting::format_accumulated;
use rusqlite::Connection;

const COLLECTION: &str = SessionRow::TABLE;

pub struct SessionQueries<'c> {
    client: DbClient<'c, SessionRow>,
    cache: QueryCache<SessionRow>,
}

impl<'c> SessionQueries<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            client: DbClient::new(conn),
            cache: QueryCache::new(),
        }
    }

    /// All sessions of a device, newest first.
    pub fn sessions(&mut self, device_id: &str) -> AppResult<Vec<SessionRow>> {
        if device_id.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(rows) = self.cache.get(COLLECTION, device_id) {
            return Ok(rows);
        }

        let rows = self.client.get_all(
            Some(&Filter::eq("device_id", device_id.to_string())),
            Some(&OrderBy::desc("started_at")),
        )?;
        self.cache.put(COLLECTION, device_id, rows.clone());
        Ok(rows)
    }

    pub fn is_cached(&self, device_id: &str) -> bool {
        self.cache.contains(COLLECTION, device_id)
    }

    /// Find one of the device's sessions by a unique id prefix.
    pub fn resolve(&mut self, device_id: &str, prefix: &str) -> AppResult<SessionRow> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(AppError::MissingField("session id"));
        }

        let mut matches = self
            .sessions(device_id)?
            .into_iter()
            .filter(|s| s.id.starts_with(prefix));

        match (matches.next(), matches.next()) {
            (Some(row), None) => Ok(row),
            (None, _) => Err(AppError::SessionNotFound(prefix.to_string())),
            (Some(_), Some(_)) => Err(AppError::AmbiguousId(prefix.to_string())),
        }
    }

    pub fn save_session(&mut self, session: &NewSession) -> AppResult<SessionRow> {
        if session.device_id.is_empty() {
            return Err(AppError::IdentityUnavailable);
        }

        let row = self.client.insert(session)?;
        self.cache.invalidate(COLLECTION);

        audit_quietly(
            self.client.conn(),
            "session_add",
            &row.id,
            &format!(
                "{} session of {}",
                row.category,
                format_accumulated(row.duration_seconds)
            ),
        );
        Ok(row)
    }

    /// Delete one session. `false` when no row had that id.
    pub fn delete_session(&mut self, id: &str) -> AppResult<bool> {
        let Some(row) = self.client.get_one(id)? else {
            return Ok(false);
        };

        self.client.delete(id)?;
        self.cache.invalidate(COLLECTION);

        audit_quietly(
            self.client.conn(),
            "del",
            id,
            &format!("Session deleted ({} {})", row.category, row.started_at),
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
    use crate::models::category::Category;
    use chrono::{TimeZone, Utc};

    fn new_session(device: &str, secs: i64, hour: u32) -> NewSession {
        NewSession {
            device_id: device.to_string(),
            category: Category::Cs,
            started_at: Utc.with_ymd_and_hms(2026, 2, 21, hour, 0, 0).unwrap(),
            duration_seconds: secs,
            description: None,
        }
    }

    #[test]
    fn sessions_are_newest_first_and_per_device() {
        let pool = DbPool::open_in_memory().unwrap();
        let mut q = SessionQueries::new(&pool.conn);

        q.save_session(&new_session("dev-a", 60, 1)).unwrap();
        q.save_session(&new_session("dev-a", 120, 3)).unwrap();
        q.save_session(&new_session("dev-b", 30, 2)).unwrap();

        let rows = q.sessions("dev-a").unwrap();
        let durations: Vec<i64> = rows.iter().map(|r| r.duration_seconds).collect();
        assert_eq!(durations, vec![120, 60]);
    }

    #[test]
    fn empty_device_id_disables_reads_and_rejects_writes() {
        let pool = DbPool::open_in_memory().unwrap();
        let mut q = SessionQueries::new(&pool.conn);

        assert!(q.sessions("").unwrap().is_empty());
        assert!(!q.is_cached(""));
        assert!(matches!(
            q.save_session(&new_session("", 60, 1)),
            Err(AppError::IdentityUnavailable)
        ));
    }

    #[test]
    fn cache_is_served_until_a_write_succeeds() {
        let pool = DbPool::open_in_memory().unwrap();
        let mut q = SessionQueries::new(&pool.conn);

        assert!(q.sessions("dev").unwrap().is_empty());
        assert!(q.is_cached("dev"));

        // written behind the query layer's back: not visible yet
        DbClient::<SessionRow>::new(&pool.conn)
            .insert(&new_session("dev", 10, 1))
            .unwrap();
        assert!(q.sessions("dev").unwrap().is_empty());

        // a rejected write keeps the cache
        assert!(q.save_session(&new_session("dev", -5, 2)).is_err());
        assert!(q.is_cached("dev"));

        q.save_session(&new_session("dev", 20, 3)).unwrap();
        assert!(!q.is_cached("dev"));
        assert_eq!(q.sessions("dev").unwrap().len(), 2);
    }

    #[test]
    fn delete_session_reports_absence() {
        let pool = DbPool::open_in_memory().unwrap();
        let mut q = SessionQueries::new(&pool.conn);

        let row = q.save_session(&new_session("dev", 60, 1)).unwrap();
        assert_eq!(q.resolve("dev", &row.id[..6]).unwrap().id, row.id);
        assert!(q.delete_session(&row.id).unwrap());
        assert!(matches!(
            q.resolve("dev", &row.id),
            Err(AppError::SessionNotFound(_))
        ));
        assert!(!q.delete_session(&row.id).unwrap());
        assert!(q.sessions("dev").unwrap().is_empty());
    }
}
