use bazaar_storage::queries;

use crate::{BazaarService, Error, Result};

impl BazaarService {
	/// Maps a user to the code the returns collaborator knows them by.
	///
	/// A missing mapping row and a row with a blank code are both `NotFound`. Callers treat that as
	/// a signal to fall back, not as a user-facing failure.
	pub async fn resolve_user_code(&self, user_id: &str) -> Result<String> {
		let mapping = queries::find_user_mapping(&self.db.pool, user_id).await?;

		match mapping {
			Some(mapping) if !mapping.code.trim().is_empty() => Ok(mapping.code.trim().to_string()),
			_ => Err(Error::NotFound {
				message: format!("No downstream code is mapped for user {user_id:?}."),
			}),
		}
	}

	pub async fn ensure_user_exists(&self, user_id: &str) -> Result<()> {
		crate::require_non_empty("user_id", user_id)?;

		if !queries::user_exists(&self.db.pool, user_id).await? {
			return Err(Error::NotFound { message: "User not found.".to_string() });
		}

		Ok(())
	}
}
