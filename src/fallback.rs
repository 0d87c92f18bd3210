//! User-facing replies for when no answer can be produced.

use rand::Rng;

/// Replies shown instead of an answer. All of them read as "I could not get
/// at this video", whatever actually went wrong.
pub const APOLOGIES: [&str; 10] = [
    "Sorry, I couldn't load this video's content, so I can't answer that right now.",
    "I wasn't able to get a transcript for this video. Please try again later.",
    "Apologies, I don't have any context for this video yet.",
    "Sorry, I can't seem to access what's said in this video at the moment.",
    "I couldn't process this video, so I don't know what it covers. Try again in a bit?",
    "Unfortunately I have nothing to go on for this video right now.",
    "Sorry, something went wrong while reading this video. Please ask again shortly.",
    "I'm unable to answer questions about this video at the moment.",
    "This video's audio couldn't be processed, so I can't help with that question yet.",
    "Sorry, I don't have enough information about this video to answer.",
];

/// Pick a reply uniformly from [`APOLOGIES`].
pub fn pick_apology<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    APOLOGIES[rng.gen_range(0..APOLOGIES.len())]
}

/// Whether `message` is one of the fallback replies.
pub fn is_apology(message: &str) -> bool {
    APOLOGIES.contains(&message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_pick_is_from_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(is_apology(pick_apology(&mut rng)));
        }
    }

    #[test]
    fn test_same_seed_same_choice() {
        let a = pick_apology(&mut StdRng::seed_from_u64(42));
        let b = pick_apology(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_reply_is_reachable() {
        let mut rng = StdRng::seed_from_u64(1);
        let seen: HashSet<&str> = (0..1000).map(|_| pick_apology(&mut rng)).collect();
        assert_eq!(seen.len(), APOLOGIES.len());
    }

    #[test]
    fn test_pool_is_distinct_and_non_empty() {
        let unique: HashSet<&str> = APOLOGIES.iter().copied().collect();
        assert_eq!(unique.len(), APOLOGIES.len());
        assert!(APOLOGIES.iter().all(|a| !a.trim().is_empty()));
        assert!(!is_apology("The video explains recursion."));
    }
}
