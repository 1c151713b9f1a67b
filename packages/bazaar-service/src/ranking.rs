use std::collections::{HashMap, HashSet};

use bazaar_providers::ranking::RankedCatalog;

use crate::BazaarService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankOutcome {
	pub ids: Vec<String>,
	/// False when the candidate order was kept because ranking failed or returned nothing.
	pub applied: bool,
}

impl BazaarService {
	/// Orders `candidates` for `user_id`. Any ranking failure, or an empty ranking, keeps the
	/// candidate list unchanged.
	pub async fn rank_candidates(&self, candidates: &[String], user_id: &str) -> RankOutcome {
		let identity = || RankOutcome { ids: candidates.to_vec(), applied: false };

		if candidates.is_empty() {
			return identity();
		}

		let result =
			self.providers.ranking.rank(&self.cfg.providers.ranking, candidates, user_id).await;
		let ranked = match result {
			Ok(ranked) => ranked,
			Err(err) => {
				tracing::warn!(
					user_id,
					candidates = candidates.len(),
					error = %err,
					"Ranking failed; keeping candidate order."
				);

				return identity();
			},
		};
		let ids = ranked_subset(ranked, candidates);

		if ids.is_empty() {
			tracing::warn!(user_id, "Ranking returned no usable catalogs; keeping candidate order.");

			return identity();
		}

		RankOutcome { ids, applied: true }
	}
}

/// Drops identifiers the collaborator invented so the result only names input candidates.
fn ranked_subset(ranked: Vec<RankedCatalog>, candidates: &[String]) -> Vec<String> {
	let allowed = candidates.iter().map(String::as_str).collect::<HashSet<_>>();
	let total = ranked.len();
	let ids = ranked
		.into_iter()
		.map(|item| item.catalog_id)
		.filter(|id| allowed.contains(id.as_str()))
		.collect::<Vec<_>>();

	if ids.len() < total {
		tracing::warn!(
			dropped = total - ids.len(),
			"Ranking returned catalogs outside the candidate list."
		);
	}

	ids
}

/// Stable-sorts `items` into the order of `ranked_ids`.
///
/// The first occurrence of an id decides its position. Items whose id is not ranked keep their
/// relative order after every ranked item.
pub fn resort_by_rank<T, F>(mut items: Vec<T>, ranked_ids: &[String], key: F) -> Vec<T>
where
	F: Fn(&T) -> &str,
{
	let mut position = HashMap::with_capacity(ranked_ids.len());

	for (index, id) in ranked_ids.iter().enumerate() {
		position.entry(id.as_str()).or_insert(index);
	}

	let unranked = ranked_ids.len();

	items.sort_by_key(|item| position.get(key(item)).copied().unwrap_or(unranked));

	items
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(raw: &[&str]) -> Vec<String> {
		raw.iter().map(|id| id.to_string()).collect()
	}

	fn ranked(raw: &[&str]) -> Vec<RankedCatalog> {
		raw.iter()
			.enumerate()
			.map(|(index, id)| RankedCatalog {
				catalog_id: id.to_string(),
				pctr_score: 1.0 - index as f64 * 0.1,
			})
			.collect()
	}

	#[test]
	fn resort_follows_rank_order() {
		let items = vec![("48", 'a'), ("108", 'b')];
		let sorted = resort_by_rank(items, &ids(&["108", "48"]), |item| item.0);

		assert_eq!(sorted, vec![("108", 'b'), ("48", 'a')]);
	}

	#[test]
	fn unranked_items_trail_in_original_order() {
		let items = vec![("z", 1), ("b", 2), ("y", 3), ("a", 4), ("x", 5)];
		let sorted = resort_by_rank(items, &ids(&["a", "b"]), |item| item.0);

		assert_eq!(sorted, vec![("a", 4), ("b", 2), ("z", 1), ("y", 3), ("x", 5)]);
	}

	#[test]
	fn first_occurrence_wins_for_duplicate_ranks() {
		let items = vec![("b", 1), ("a", 2)];
		let sorted = resort_by_rank(items, &ids(&["a", "b", "a"]), |item| item.0);

		assert_eq!(sorted, vec![("a", 2), ("b", 1)]);
	}

	#[test]
	fn duplicate_items_stay_stable() {
		let items = vec![("a", 1), ("b", 2), ("a", 3)];
		let sorted = resort_by_rank(items, &ids(&["b", "a"]), |item| item.0);

		assert_eq!(sorted, vec![("b", 2), ("a", 1), ("a", 3)]);
	}

	#[test]
	fn subset_drops_unknown_ids() {
		let kept = ranked_subset(ranked(&["9", "2", "7", "1"]), &ids(&["1", "2", "3"]));

		assert_eq!(kept, ids(&["2", "1"]));
	}

	#[test]
	fn subset_of_foreign_ranking_is_empty() {
		assert!(ranked_subset(ranked(&["9"]), &ids(&["1"])).is_empty());
	}
}
