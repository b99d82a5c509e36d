use super::cache::QueryCache;
use crate::db::log::audit_quietly;
use crate::errors::{AppError, AppResult};
use crate::models::problem::{AlgorithmProblem, NewProblem, ProblemPatch};
use crate::store::{DbClient, Filter, OrderBy, Record};
use crate::utils::formatting::format_optional_seconds;
use rusqlite::Connection;

const COLLECTION: &str = AlgorithmProblem::TABLE;

pub struct ProblemQueries<'c> {
    client: DbClient<'c, AlgorithmProblem>,
    cache: QueryCache<AlgorithmProblem>,
}

impl<'c> ProblemQueries<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            client: DbClient::new(conn),
            cache: QueryCache::new(),
        }
    }

    /// All problems of a device, earliest review date first.
    pub fn problems(&mut self, device_id: &str) -> AppResult<Vec<AlgorithmProblem>> {
        if device_id.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(rows) = self.cache.get(COLLECTION, device_id) {
            return Ok(rows);
        }

        let rows = self.client.get_all(
            Some(&Filter::eq("device_id", device_id.to_string())),
            Some(&OrderBy::asc("review_by")),
        )?;
        self.cache.put(COLLECTION, device_id, rows.clone());
        Ok(rows)
    }

    pub fn is_cached(&self, device_id: &str) -> bool {
        self.cache.contains(COLLECTION, device_id)
    }

    pub fn problem(&self, id: &str) -> AppResult<Option<AlgorithmProblem>> {
        Ok(self.client.get_one(id)?)
    }

    /// Find one of the device's problems by a unique id prefix.
    pub fn resolve(&mut self, device_id: &str, prefix: &str) -> AppResult<AlgorithmProblem> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(AppError::MissingField("problem id"));
        }

        let mut matches = self
            .problems(device_id)?
            .into_iter()
            .filter(|p| p.id.starts_with(prefix));

        match (matches.next(), matches.next()) {
            (Some(problem), None) => Ok(problem),
            (None, _) => Err(AppError::ProblemNotFound(prefix.to_string())),
            (Some(_), Some(_)) => Err(AppError::AmbiguousId(prefix.to_string())),
        }
    }

    pub fn add_problem(&mut self, problem: &NewProblem) -> AppResult<AlgorithmProblem> {
        if problem.device_id.is_empty() {
            return Err(AppError::IdentityUnavailable);
        }

        let row = self.client.insert(problem)?;
        self.cache.invalidate(COLLECTION);

        let kind = if row.reviewed { "one-shot" } else { "to review" };
        audit_quietly(
            self.client.conn(),
            "problem_add",
            &row.id,
            &format!(
                "'{}' solved in {} ({kind}, review by {})",
                row.problem_name,
                format_optional_seconds(row.first_solve_seconds),
                row.review_by
            ),
        );
        Ok(row)
    }

    pub fn update_problem(&mut self, id: &str, patch: &ProblemPatch) -> AppResult<AlgorithmProblem> {
        let row = self.client.update(id, patch)?;
        self.cache.invalidate(COLLECTION);

        if patch.reviewed == Some(true) {
            audit_quietly(
                self.client.conn(),
                "review_done",
                &row.id,
                &format!(
                    "'{}' re-solved in {}",
                    row.problem_name,
                    format_optional_seconds(row.second_solve_seconds)
                ),
            );
        }
        Ok(row)
    }

    /// Delete one problem. `false` when no row had that id.
    pub fn delete_problem(&mut self, id: &str) -> AppResult<bool> {
        let Some(row) = self.client.get_one(id)? else {
            return Ok(false);
        };

        self.client.delete(id)?;
        self.cache.invalidate(COLLECTION);

        audit_quietly(
            self.client.conn(),
            "del",
            id,
            &format!("Problem deleted ('{}')", row.problem_name),
        );
        Ok(true)
    }
}
