use std::collections::HashMap;
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ThanksRankingEntry {
  #[tabled(rename = "#")]
  pub place: usize,
  #[tabled(rename = "User")]
  pub name: String,
  #[tabled(rename = "Thanks")]
  pub thanks: usize,
}

/// Returns the (name, thanks) pairs with at least `minimum_actions` thanks.
///
/// Most thanks come first, ties are ordered by name so the output is the same between runs.
pub fn rank_thanks_counts(
  thanks_counts: &HashMap<String, usize>,
  minimum_actions: usize,
) -> Vec<(String, usize)> {
  let mut rankings: Vec<(String, usize)> = thanks_counts
    .iter()
    .filter(|(_, thanks)| **thanks >= minimum_actions)
    .map(|(name, thanks)| (name.clone(), *thanks))
    .collect();

  rankings.sort_by(|(left_name, left_thanks), (right_name, right_thanks)| {
    right_thanks
      .cmp(left_thanks)
      .then_with(|| left_name.cmp(right_name))
  });

  rankings
}

/// Assigns places to already sorted rankings.
///
/// Users with the same amount of thanks share a place, and the next place skips ahead
/// by the size of the tie. e.g. 1, 2, 2, 4
pub fn assign_places(rankings: Vec<(String, usize)>) -> Vec<ThanksRankingEntry> {
  let mut place = 1;
  let mut same_thanks_run = 0;
  let mut last_thanks = None;

  rankings
    .into_iter()
    .map(|(name, thanks)| {
      if last_thanks == Some(thanks) {
        same_thanks_run += 1;
      } else {
        place += same_thanks_run;
        same_thanks_run = 1;
      }

      last_thanks = Some(thanks);

      ThanksRankingEntry {
        place,
        name,
        thanks,
      }
    })
    .collect()
}
