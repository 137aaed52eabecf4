//! Small randomization helpers shared by the challenge generator.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

/// Upper bound on rejection-sampling draws before switching to a linear scan.
pub const MAX_DRAW_ATTEMPTS: usize = 64;

/// Return a shuffled copy of `items`.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
  let mut out = items.to_vec();
  out.shuffle(rng);
  out
}

/// Draw `count` distinct values from `pool`, none equal to `exclude`.
///
/// Uniform rejection sampling first, bounded by `MAX_DRAW_ATTEMPTS`. If that
/// runs dry, a scan from a random offset picks up whatever is left, and as a
/// last resort already-chosen values are repeated. Always terminates.
pub fn draw_distinct<R: Rng + ?Sized>(pool: &[String], exclude: &str, count: usize, rng: &mut R) -> Vec<String> {
  let mut chosen: Vec<String> = Vec::with_capacity(count);
  if pool.is_empty() || count == 0 {
    return chosen;
  }

  let accept = |cand: &str, chosen: &[String]| cand != exclude && !chosen.iter().any(|c| c == cand);

  let mut attempts = 0;
  while chosen.len() < count && attempts < MAX_DRAW_ATTEMPTS {
    attempts += 1;
    let cand = &pool[rng.gen_range(0..pool.len())];
    if accept(cand, &chosen) {
      chosen.push(cand.clone());
    }
  }

  if chosen.len() < count {
    let offset = rng.gen_range(0..pool.len());
    for i in 0..pool.len() {
      let cand = &pool[(offset + i) % pool.len()];
      if chosen.len() == count {
        break;
      }
      if accept(cand, &chosen) {
        chosen.push(cand.clone());
      }
    }
  }

  if chosen.len() < count {
    warn!(target: "game", wanted = count, found = chosen.len(), pool = pool.len(), "Distractor pool starved; padding with repeats");
    let distinct = chosen.len();
    let mut i = 0;
    while distinct > 0 && chosen.len() < count {
      chosen.push(chosen[i % distinct].clone());
      i += 1;
    }
  }

  chosen
}

/// True for a non-empty string made only of `A`..=`Z`.
pub fn is_upper_word(s: &str) -> bool {
  !s.is_empty() && s.chars().all(|c| c.is_ascii_uppercase())
}
