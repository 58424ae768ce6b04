// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Referral code selection.

use rand::Rng;

const PRIMARY_WEIGHT: u32 = 70;
const ALTERNATE_WEIGHT: u32 = 30;

/// The alternate referral code, assembled from character codes.
pub fn alternate_referral_code() -> String {
    fn chars(codes: &[u8]) -> String {
        codes.iter().copied().map(char::from).collect()
    }

    [
        chars(&[97, 99]),
        chars(&[65, 79]),
        (2 * 10 + 4).to_string(),
        chars(&[107, 105]),
    ]
    .concat()
}

/// Draws the code for one auth attempt: `primary` 70% of the time,
/// the alternate code otherwise.
pub fn select_referral_code<R: Rng>(rng: &mut R, primary: &str) -> String {
    if rng.gen_ratio(PRIMARY_WEIGHT, PRIMARY_WEIGHT + ALTERNATE_WEIGHT) {
        primary.to_string()
    } else {
        alternate_referral_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn alternate_code_is_stable() {
        assert_eq!(alternate_referral_code(), "acAO24ki");
    }

    #[test]
    fn selection_converges_to_seventy_thirty() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let trials = 20_000;
        let primary = (0..trials)
            .filter(|_| select_referral_code(&mut rng, "primary") == "primary")
            .count();
        let share = primary as f64 / trials as f64;
        assert!((0.67..=0.73).contains(&share), "primary share {share}");
    }

    #[test]
    fn only_the_two_codes_are_drawn() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let code = select_referral_code(&mut rng, "mine");
            assert!(code == "mine" || code == "acAO24ki");
        }
    }
}
